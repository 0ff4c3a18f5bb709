use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReductionError {
    #[error("gave up after {steps} reduction steps")]
    LimitExceeded { steps: usize },
    #[error("interrupted after {steps} reduction steps")]
    Cancelled { steps: usize },
}

/// Bounds on how long `normalize` may keep going.
///
/// Some expressions have no normal form, e.g. `(λx. x x) (λx. x x)`,
/// and reducing them never ends. The default has neither a step bound nor a
/// cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct Limits {
    pub max_steps: Option<usize>,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Limits {
    pub fn unbounded() -> Limits {
        Limits::default()
    }

    pub fn max_steps(max_steps: usize) -> Limits {
        Limits {
            max_steps: Some(max_steps),
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Limits {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }
}

/// Whether `expr` contains a redex anywhere, including inside lambda bodies.
pub fn is_reducible(expr: &Expr) -> bool {
    match expr {
        Expr::Var(_) => false,
        Expr::Lambda { body, .. } => is_reducible(body),
        Expr::App(left, right) => {
            left.is_lambda() || is_reducible(left) || is_reducible(right)
        },
    }
}

/// Applies a single beta reduction to the leftmost outermost redex.
/// Expressions without a redex are returned unchanged.
///
/// ```
/// # use lambda_front::{Expr, reduce::reduce};
/// let expr = Expr::app(Expr::lambda("x", Expr::var("x")), Expr::var("y"));
/// assert_eq!(reduce(&expr), Expr::var("y"));
/// ```
pub fn reduce(expr: &Expr) -> Expr {
    reduce_once(expr).unwrap_or_else(|| expr.clone())
}

// Normal order (leftmost outermost redex first), otherwise certain
// reductions would loop forever, e.g. (λx. a) ((λy. y y) (λy. y y)).
// Returns None when there's nothing left to reduce.
fn reduce_once(expr: &Expr) -> Option<Expr> {
    match expr {
        Expr::Var(_) => None,
        Expr::Lambda { var_name, body } => {
            let body = reduce_once(body)?;
            Some(Expr::Lambda {
                var_name: var_name.clone(),
                body: Box::new(body),
            })
        },
        Expr::App(left, right) => {
            if let Expr::Lambda { var_name, body } = &**left {
                return Some(substitute(var_name, right, body));
            }
            if let Some(new_left) = reduce_once(left) {
                return Some(Expr::App(Box::new(new_left), right.clone()));
            }
            let new_right = reduce_once(right)?;
            Some(Expr::App(left.clone(), Box::new(new_right)))
        },
    }
}

/// Replaces the free occurrences of `variable` in `expr` by `replacement`,
/// renaming lambda variables of `expr` whenever they would capture a free
/// variable of `replacement`.
///
/// ```
/// # use lambda_front::{Expr, reduce::{substitute, is_free_variable}};
/// // (λy. x)[x := y] must not become λy. y
/// let expr = Expr::lambda("y", Expr::var("x"));
/// let result = substitute("x", &Expr::var("y"), &expr);
/// match &result {
///     Expr::Lambda { var_name, body } => {
///         assert_ne!(var_name, "y");
///         assert_eq!(**body, Expr::var("y"));
///     },
///     _ => panic!("expected a lambda"),
/// }
/// assert!(is_free_variable("y", &result));
/// ```
pub fn substitute(variable: &str, replacement: &Expr, expr: &Expr) -> Expr {
    match expr {
        Expr::Var(name) => {
            if name == variable {
                replacement.clone()
            } else {
                expr.clone()
            }
        },
        Expr::App(left, right) => Expr::app(
            substitute(variable, replacement, left),
            substitute(variable, replacement, right),
        ),
        Expr::Lambda { var_name, body } => {
            if var_name == variable {
                // shadowed, nothing below refers to `variable`.
                expr.clone()
            } else if is_free_variable(var_name, replacement) {
                let new_name = fresh_name(var_name);
                debug!("renaming {} to {} to avoid capture", var_name, new_name);
                let renamed = substitute(var_name, &Expr::var(&new_name), body);
                Expr::Lambda {
                    var_name: new_name,
                    body: Box::new(substitute(variable, replacement, &renamed)),
                }
            } else {
                Expr::Lambda {
                    var_name: var_name.clone(),
                    body: Box::new(substitute(variable, replacement, body)),
                }
            }
        },
    }
}

static FRESH_NAME_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A variable name never returned before in this process.
///
/// The `'` marker can't be produced by the lexer, so fresh names never
/// clash with names that came from parsing.
pub fn fresh_name(base: &str) -> String {
    let base = base.split('\'').next().unwrap_or(base);
    let n = FRESH_NAME_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}'{}", base, n)
}

/// Whether `variable` occurs in `expr` outside of any lambda binding it.
pub fn is_free_variable(variable: &str, expr: &Expr) -> bool {
    match expr {
        Expr::Var(name) => name == variable,
        Expr::App(left, right) => {
            is_free_variable(variable, left) || is_free_variable(variable, right)
        },
        Expr::Lambda { var_name, body } => {
            var_name != variable && is_free_variable(variable, body)
        },
    }
}

/// All variables occurring free in `expr`.
pub fn free_variables(expr: &Expr) -> HashSet<String> {
    fn collect<'a>(expr: &'a Expr, bound: &mut Vec<&'a str>, free: &mut HashSet<String>) {
        match expr {
            Expr::Var(name) => {
                if !bound.contains(&name.as_str()) {
                    free.insert(name.clone());
                }
            },
            Expr::App(left, right) => {
                collect(left, bound, free);
                collect(right, bound, free);
            },
            Expr::Lambda { var_name, body } => {
                bound.push(var_name);
                collect(body, bound, free);
                bound.pop();
            },
        }
    }
    let mut free = HashSet::new();
    collect(expr, &mut Vec::new(), &mut free);
    free
}

/// The successive results of beta reducing an expression, one step at a
/// time. Ends once a normal form is reached, which may be never.
#[derive(Debug, Clone)]
pub struct Reductions {
    current: Option<Expr>,
}

impl Reductions {
    pub fn new(expr: Expr) -> Reductions {
        Reductions {
            current: Some(expr),
        }
    }
}

impl Iterator for Reductions {
    type Item = Expr;

    fn next(&mut self) -> Option<Expr> {
        let next = reduce_once(self.current.as_ref()?);
        self.current = next.clone();
        next
    }
}

/// Applies beta reductions until it's no longer possible.
///
/// Uses normal order reduction strategy, so whenever a normal form exists
/// it is found, given enough steps:
///
/// ```
/// # use lambda_front::{parse_str, reduce::{normalize, Limits}};
/// let expr = parse_str("(λx. a) ((λy. y y) (λy. y y))").unwrap();
/// assert_eq!(normalize(&expr, &Limits::max_steps(10)).unwrap(), parse_str("a").unwrap());
/// ```
///
/// This function does not attempt to predict infinite loops: it keeps going
/// until `limits` say otherwise.
///
/// ```
/// # use lambda_front::{parse_str, reduce::{normalize, Limits, ReductionError}};
/// let omega = parse_str("(λx. x x) (λx. x x)").unwrap();
/// assert_eq!(
///     normalize(&omega, &Limits::max_steps(100)),
///     Err(ReductionError::LimitExceeded { steps: 100 })
/// );
/// ```
pub fn normalize(expr: &Expr, limits: &Limits) -> Result<Expr, ReductionError> {
    normalize_with(expr, limits, |_, _| {})
}

/// Same as `normalize`, calling `on_step` with the step number and the
/// result of every reduction along the way.
pub fn normalize_with<F>(expr: &Expr, limits: &Limits, mut on_step: F) -> Result<Expr, ReductionError>
    where F: FnMut(usize, &Expr)
{
    let mut result = expr.clone();
    let mut steps = 0;
    loop {
        if limits.is_cancelled() {
            debug!(steps, "normalization cancelled");
            return Err(ReductionError::Cancelled { steps });
        }
        if !is_reducible(&result) {
            debug!(steps, "reached normal form");
            return Ok(result);
        }
        if limits.max_steps.map_or(false, |max| steps >= max) {
            debug!(steps, "step limit exceeded");
            return Err(ReductionError::LimitExceeded { steps });
        }
        result = reduce(&result);
        steps += 1;
        trace!(step = steps, expr = %result, "reduced");
        on_step(steps, &result);
    }
}
