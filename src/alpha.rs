use crate::ast::Expr;
use crate::reduce::{is_free_variable, substitute};

/// Whether `a` and `b` only differ in the names of their lambda variables.
///
/// Free variables are only equivalent to variables with the same name.
///
/// ```
/// # use lambda_front::{Expr, alpha::is_alpha_equivalent};
/// let id_x = Expr::lambda("x", Expr::var("x"));
/// let id_y = Expr::lambda("y", Expr::var("y"));
/// assert!(is_alpha_equivalent(&id_x, &id_y));
/// assert!(!is_alpha_equivalent(&id_x, &Expr::lambda("x", Expr::var("y"))));
/// ```
pub fn is_alpha_equivalent(a: &Expr, b: &Expr) -> bool {
    match (a, b) {
        (Expr::App(left_a, right_a), Expr::App(left_b, right_b)) => {
            is_alpha_equivalent(left_a, left_b) && is_alpha_equivalent(right_a, right_b)
        },
        (
            Expr::Lambda { var_name: var_a, body: body_a },
            Expr::Lambda { var_name: var_b, body: body_b },
        ) => {
            // renaming b's variable to a's must not capture anything in b.
            !is_free_variable(var_a, b)
                && is_alpha_equivalent(body_a, &substitute(var_b, &Expr::var(var_a), body_b))
        },
        (Expr::Var(name_a), Expr::Var(name_b)) => name_a == name_b,
        _ => false,
    }
}
