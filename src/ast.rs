use std::fmt;
use std::fmt::{Display, Formatter};

/// A lambda calculus expression.
///
/// Multi-variable lambdas only exist in the concrete syntax: `λx y . e`
/// is always stored as `λx . λy . e`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Expr {
    Var(String),
    Lambda { var_name: String, body: Box<Expr> },
    App(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    pub fn lambda(var_name: &str, body: Expr) -> Expr {
        Expr::Lambda {
            var_name: var_name.to_string(),
            body: Box::new(body),
        }
    }

    /// Nests one lambda per name, the first name being the outermost.
    pub fn lambdas<S: AsRef<str>>(var_names: &[S], body: Expr) -> Expr {
        var_names
            .iter()
            .rev()
            .fold(body, |body, name| Expr::lambda(name.as_ref(), body))
    }

    pub fn app(operator: Expr, operand: Expr) -> Expr {
        Expr::App(Box::new(operator), Box::new(operand))
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Expr::Var(_))
    }

    pub fn is_lambda(&self) -> bool {
        matches!(self, Expr::Lambda { .. })
    }

    pub fn is_app(&self) -> bool {
        matches!(self, Expr::App(_, _))
    }

    fn fmt_operator(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_lambda() {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }

    fn fmt_operand(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_var() {
            write!(f, "{}", self)
        } else {
            write!(f, "({})", self)
        }
    }
}

/// Prints the expression using as few parentheses as possible, and
/// collapsing nested lambdas into a single one with many variables.
///
/// ```
/// # use lambda_front::Expr;
/// let expr = Expr::lambdas(&["x", "y", "z"], Expr::var("z"));
/// assert_eq!(expr.to_string(), "λ x y z . z");
///
/// let expr = Expr::app(
///     Expr::app(Expr::var("a"), Expr::var("b")),
///     Expr::app(Expr::var("c"), Expr::var("d")),
/// );
/// assert_eq!(expr.to_string(), "a b (c d)");
/// ```
impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Lambda { .. } => {
                write!(f, "λ")?;
                let mut inner = self;
                while let Expr::Lambda { var_name, body } = inner {
                    write!(f, " {}", var_name)?;
                    inner = &**body;
                }
                write!(f, " . {}", inner)
            },
            Expr::App(left, right) => {
                left.fmt_operator(f)?;
                write!(f, " ")?;
                right.fmt_operand(f)
            },
        }
    }
}

/// Renders `expr` in its canonical textual form.
pub fn as_string(expr: &Expr) -> String {
    expr.to_string()
}
