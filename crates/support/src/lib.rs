//! Support desk domain module.
//!
//! Customer tickets and their resolution by staff.

pub mod ticket;

pub use ticket::{
    OpenTicket, ResolveTicket, Ticket, TicketCommand, TicketEvent, TicketOpened, TicketResolved,
    TicketStatus,
};
