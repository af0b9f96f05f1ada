//! Macros for constructing rule model components.

/// Collect a comma separated list of terms into a vector.
///
/// `?x` denotes the variable `x`, everything else is converted with `Term::from`.
#[macro_export]
macro_rules! term_list {
    // Base case
    ($terms:ident; ) => {};
    // Match a single variable
    ($terms:ident; ? $var:ident) => {
        $terms.push($crate::rule_model::components::term::Term::variable(stringify!($var)));
    };
    // Match variables
    ($terms:ident; ? $var:ident, $($others:tt)* ) => {
        $terms.push($crate::rule_model::components::term::Term::variable(stringify!($var))); $crate::term_list!($terms; $($others)*)
    };
    // Match a single occurence of anything
    ($terms:ident; $e:tt) => {
        $terms.push($crate::rule_model::components::term::Term::from($e));
    };
    // Match a list of anything
    ($terms:ident; $e:tt, $($others:tt)* ) => {
        $terms.push($crate::rule_model::components::term::Term::from($e)); $crate::term_list!($terms; $($others)*)
    };
}

/// Construct an [Atom][crate::rule_model::components::atom::Atom].
///
/// The arity of the predicate is the number of given terms.
#[macro_export]
macro_rules! atom {
    // Base case: no elements
    ($name:tt) => {
        $crate::rule_model::components::atom::Atom::with_name($name, Vec::new())
    };
    // Recursive case: handle each term, separated by commas
    ($name:tt; $($tt:tt)*) => {{
        let mut terms: Vec<$crate::rule_model::components::term::Term> = Vec::new();
        $crate::term_list!(terms; $($tt)*);
        $crate::rule_model::components::atom::Atom::with_name($name, terms)
    }};
}

/// Construct a [FunctionTerm][crate::rule_model::components::term::function::FunctionTerm].
///
/// The arity of the function symbol is the number of given terms.
#[macro_export]
macro_rules! function {
    ($name:tt; $($tt:tt)*) => {{
        let mut terms: Vec<$crate::rule_model::components::term::Term> = Vec::new();
        $crate::term_list!(terms; $($tt)*);
        $crate::rule_model::components::term::function::FunctionTerm::with_name($name, terms)
    }};
}
