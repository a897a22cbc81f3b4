use super::DialectLibrary;
use super::qiskit::QiskitLibrary;
use crate::{Options, transform, transform_with};

#[test]
fn dialect_detection_examples() {
    // Array of (expected_fence_tag, input_string)
    let cases: Vec<(&str, &str)> = vec![
        ("python", "import numpy as np\nx = np.zeros(3)"),
        ("python", "from qiskit import QuantumCircuit\nqc = QuantumCircuit(2)"),
        ("python", "qc.h[0]\nqc.cx[0,1]"),
        ("python", "df.groupby(['region']).head(3)"),
        ("python", "def greet(name):\n    return f'hello {name}'"),
        ("qsharp", "namespace Demo {\n    operation Main() : Unit {\n    }\n}"),
        ("qsharp", "open Microsoft.Quantum.Intrinsic;\nopen Microsoft.Quantum.Canon;"),
        ("qsharp", "use q = Qubit();\nH(q);"),
        ("javascript", "const greeting = 'hi';\nconsole.log(greeting);"),
        ("javascript", "function add(a, b) {\n    return a + b;\n}"),
        ("text", "CODE: mystery.invoke(7);"),
    ];

    for (expected_tag, input) in cases {
        let res = transform_with(input, &Options::default());
        assert_eq!(res.spans.len(), 1, "expected one span for {input:?}, got {:?}", res.spans);
        assert_eq!(res.spans[0].tag, expected_tag, "wrong tag for {input:?}");
        assert!(res.output.contains(&format!("```{expected_tag}")), "missing fence tag in {:?}", res.output);
    }
}

#[test]
fn qiskit_correction_examples() {
    // Array of (expected, input) run through the Qiskit correction table.
    let cases: Vec<(&str, &str)> = vec![
        ("qc.h(0)", "qc.h[0]"),
        ("qc.x(1)", "qc.x[1]"),
        ("qc.cx(0, 1)", "qc.cx[0,1]"),
        ("qc.ccx(0, 1, 2)", "qc.ccx[0,1,2]"),
        ("qc.measure(0, 0)", "qc.measure[0, 0]"),
        ("qc.draw()", "qc.draw[]"),
        ("qc = QuantumCircuit(3)", "qc = QuantumCircuit([3])"),
        ("qc = QuantumCircuit(2, 2)", "qc = QuantumCircuit([2, 2])"),
        ("qr = QuantumRegister(4)", "qr = QuantumRegister[4]"),
        // Legitimate indexing stays untouched: not a known gate method.
        ("counts['00']", "counts['00']"),
        ("df.iloc[0]", "df.iloc[0]"),
        ("qubits[2]", "qubits[2]"),
    ];

    for (expected, input) in cases {
        assert_eq!(QiskitLibrary.correct(input), expected, "wrong correction for {input:?}");
    }
}

#[test]
fn qsharp_claims_before_generic() {
    // `operation ... : Unit` also contains enough structure to tempt the
    // generic libraries; order guarantees Q# wins.
    let res = transform_with("operation Flip(q : Qubit) : Unit {\n    X(q);\n}", &Options::default());
    assert_eq!(res.spans.len(), 1);
    assert_eq!(res.spans[0].tag, "qsharp");
}

#[test]
fn qiskit_claims_before_plain_python() {
    let res = transform_with(
        "from qiskit import QuantumCircuit, execute\nqc = QuantumCircuit(2)\nqc.h(0)\nqc.cx(0, 1)",
        &Options::default(),
    );
    assert_eq!(res.spans.len(), 1);
    // Qiskit is a Python specialization: the fence tag is python either way,
    // but the claim must come from the circuit rules, not the generic import
    // rule, so gate chains in the same fragment get corrected.
    let corrected = transform_with(
        "from qiskit import QuantumCircuit\nqc = QuantumCircuit([2])\nqc.h[0]",
        &Options::default(),
    );
    assert!(corrected.output.contains("qc = QuantumCircuit(2)"));
    assert!(corrected.output.contains("qc.h(0)"));
}

#[test]
fn mixed_document_recovers_each_snippet() {
    let input = "\
The search results mention two quantum examples worth comparing closely.

namespace Quantum.Hello {
    operation SayHello() : Unit {
    }
}

That was the first snippet; meanwhile the simulation counterpart follows.

from qiskit import QuantumCircuit
qc = QuantumCircuit(2)
qc.h[0]

Finally a small JavaScript helper rounds out the comparison discussion.

const shots = 1024;
console.log(shots);";

    let out = transform(input);
    assert_eq!(out.matches("```qsharp").count(), 1);
    assert_eq!(out.matches("```python").count(), 1);
    assert_eq!(out.matches("```javascript").count(), 1);
    assert!(out.contains("qc.h(0)"), "gate call not corrected: {out}");
    assert_eq!(out.matches("```").count() % 2, 0);
    // Prose stays outside every fence, in order.
    let first_prose = out.find("The search results mention").unwrap();
    let second_prose = out.find("That was the first snippet").unwrap();
    let third_prose = out.find("Finally a small JavaScript helper").unwrap();
    assert!(first_prose < second_prose && second_prose < third_prose);
}
