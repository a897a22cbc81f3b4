#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

#[macro_export]
macro_rules! kw {
    (
        name: $name:expr,
        re: $pat:literal,
        dialect: $dialect:expr
        $(, priority: $priority:expr)?
        $(,)?
    ) => {
        $crate::PatternRule {
            name: $name,
            matcher: $crate::regex!($pat),
            dialect: $dialect,
            priority: { 0 $(+ $priority)? },
        }
    };
}

#[macro_export]
macro_rules! fix {
    (
        name: $name:expr,
        re: $pat:literal,
        rewrite: $rewrite:expr
        $(,)?
    ) => {
        $crate::CorrectionRule { name: $name, matcher: $crate::regex!($pat), rewrite: $rewrite }
    };
}
