pub mod ast;
pub mod check;
pub mod compile;
pub mod run;
pub mod tokens;
