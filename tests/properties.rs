use lambda_front::{
    alpha::is_alpha_equivalent,
    as_string,
    parse_str,
    reduce::{free_variables, is_free_variable, is_reducible, normalize, reduce, substitute, Limits, Reductions},
    Expr,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Few names, so that shadowing and capture actually happen.
fn name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "x", "y", "z"]).prop_map(str::to_string)
}

fn expr() -> impl Strategy<Value = Expr> {
    let leaf = name().prop_map(Expr::Var);
    leaf.prop_recursive(5, 32, 2, |inner| {
        prop_oneof![
            (name(), inner.clone()).prop_map(|(var_name, body)| Expr::lambda(&var_name, body)),
            (inner.clone(), inner).prop_map(|(operator, operand)| Expr::app(operator, operand)),
        ]
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn size(expr: &Expr) -> usize {
    match expr {
        Expr::Var(_) => 1,
        Expr::Lambda { body, .. } => 1 + size(body),
        Expr::App(left, right) => 1 + size(left) + size(right),
    }
}

// "a", "b", ..., "z", "ba", "bb", ...
fn letters(mut n: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push((b'a' + (n % 26) as u8) as char);
        n /= 26;
        if n == 0 {
            break;
        }
    }
    out.iter().rev().collect()
}

/// Gives every lambda a brand new variable name, never used by `expr()`.
fn rename_binders(expr: &Expr, prefix: &str, counter: &mut usize) -> Expr {
    match expr {
        Expr::Var(_) => expr.clone(),
        Expr::App(left, right) => {
            let left = rename_binders(left, prefix, counter);
            Expr::app(left, rename_binders(right, prefix, counter))
        },
        Expr::Lambda { var_name, body } => {
            let new_name = format!("{}{}", prefix, letters(*counter));
            *counter += 1;
            let body = substitute(var_name, &Expr::var(&new_name), body);
            Expr::lambda(&new_name, rename_binders(&body, prefix, counter))
        },
    }
}

/// Reduces at most a bounded number of times, giving up on terms that grow
/// too much. Returns the normal form when one was reached.
fn bounded_normal_form(expr: &Expr) -> Option<Expr> {
    let mut last = expr.clone();
    for step in Reductions::new(expr.clone()).take(64) {
        if size(&step) > 2_000 {
            return None;
        }
        last = step;
    }
    if is_reducible(&last) {
        None
    } else {
        Some(last)
    }
}

// ============================================================================
// Printing and Parsing
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn printed_form_parses_back(e in expr()) {
        let parsed = parse_str(&as_string(&e)).unwrap();
        prop_assert!(is_alpha_equivalent(&parsed, &e));
        prop_assert_eq!(parsed, e);
    }

    #[test]
    fn renamed_binders_print_and_parse_back(e in expr()) {
        let renamed = rename_binders(&e, "m", &mut 0);
        let parsed = parse_str(&as_string(&renamed)).unwrap();
        prop_assert_eq!(parsed, renamed);
    }
}

// ============================================================================
// Alpha Equivalence
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn alpha_reflexive(e in expr()) {
        prop_assert!(is_alpha_equivalent(&e, &e));
    }

    #[test]
    fn alpha_symmetric(a in expr(), b in expr()) {
        prop_assert_eq!(is_alpha_equivalent(&a, &b), is_alpha_equivalent(&b, &a));
    }

    #[test]
    fn alpha_renaming(e in expr()) {
        let renamed = rename_binders(&e, "m", &mut 0);
        prop_assert!(is_alpha_equivalent(&e, &renamed));
        prop_assert!(is_alpha_equivalent(&renamed, &e));
    }

    #[test]
    fn alpha_transitive(e in expr()) {
        let once = rename_binders(&e, "m", &mut 0);
        let twice = rename_binders(&once, "n", &mut 0);
        prop_assert!(is_alpha_equivalent(&e, &once));
        prop_assert!(is_alpha_equivalent(&once, &twice));
        prop_assert!(is_alpha_equivalent(&e, &twice));
    }

    #[test]
    fn alpha_keeps_free_variables(a in expr(), b in expr()) {
        if is_alpha_equivalent(&a, &b) {
            prop_assert_eq!(free_variables(&a), free_variables(&b));
        }
    }
}

// ============================================================================
// Substitution and Reduction
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn substitution_does_not_capture(
        variable in name(),
        replacement in expr(),
        e in expr(),
    ) {
        let result = substitute(&variable, &replacement, &e);
        let free_after = free_variables(&result);

        if is_free_variable(&variable, &e) {
            for free in free_variables(&replacement) {
                prop_assert!(free_after.contains(&free), "{} got captured", free);
            }
        } else {
            prop_assert!(is_alpha_equivalent(&result, &e));
        }

        let mut allowed = free_variables(&e);
        allowed.remove(&variable);
        allowed.extend(free_variables(&replacement));
        prop_assert!(free_after.is_subset(&allowed));
    }

    #[test]
    fn substitution_of_variable_with_itself(variable in name(), e in expr()) {
        let result = substitute(&variable, &Expr::var(&variable), &e);
        prop_assert!(is_alpha_equivalent(&result, &e));
    }

    #[test]
    fn normal_forms_are_fixed_points(e in expr()) {
        if !is_reducible(&e) {
            prop_assert_eq!(reduce(&e), e);
        }
    }

    #[test]
    fn reduction_never_adds_free_variables(e in expr()) {
        let reduced = reduce(&e);
        prop_assert!(free_variables(&reduced).is_subset(&free_variables(&e)));
    }

    #[test]
    fn normalize_idempotent(e in expr()) {
        if let Some(normal) = bounded_normal_form(&e) {
            // fresh names differ between runs, only the shape has to match.
            let direct = normalize(&e, &Limits::max_steps(64)).unwrap();
            prop_assert!(is_alpha_equivalent(&direct, &normal));
            let again = normalize(&normal, &Limits::max_steps(0));
            prop_assert_eq!(again, Ok(normal));
        }
    }
}
