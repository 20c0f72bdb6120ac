pub use self::{board::*, cell::*, figure::*, shape::*};

pub(crate) mod board;
pub(crate) mod cell;
pub(crate) mod figure;
pub(crate) mod shape;
