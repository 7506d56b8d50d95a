pub mod qr;
pub mod ticket;

pub use ticket::{RenderError, TicketRenderer};
