mod form;
mod notice;
mod product;

pub use form::*;
pub use notice::*;
pub use product::*;
