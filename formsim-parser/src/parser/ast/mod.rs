pub mod binary;
pub mod call;
pub mod expr;
pub mod latex;
pub mod literal;
pub mod paren;
pub mod unary;

pub use binary::Binary;
pub use call::Call;
pub use expr::Expr;
pub use latex::{Frac, Root};
pub use literal::{Literal, LitFloat, LitInt, LitSym};
pub use paren::{Delimiter, Paren};
pub use unary::Unary;
