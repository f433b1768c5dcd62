use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medimart_auth::{ContactSnapshot, Permission, Principal, authorize};
use medimart_core::{Aggregate, AggregateRoot, DomainError, TicketId};
use medimart_events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Open,
    Resolved,
}

impl core::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            TicketStatus::Open => "OPEN",
            TicketStatus::Resolved => "RESOLVED",
        })
    }
}

/// Aggregate root: Ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    id: TicketId,
    customer: Option<ContactSnapshot>,
    subject: String,
    message: String,
    status: TicketStatus,
    response: Option<String>,
    created_at: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
}

impl Ticket {
    pub fn empty(id: TicketId) -> Self {
        Self {
            id,
            customer: None,
            subject: String::new(),
            message: String::new(),
            status: TicketStatus::Open,
            response: None,
            created_at: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> TicketId {
        self.id
    }

    pub fn customer(&self) -> Option<&ContactSnapshot> {
        self.customer.as_ref()
    }

    pub fn is_opened_by(&self, principal: &Principal) -> bool {
        self.customer
            .as_ref()
            .is_some_and(|c| c.id == principal.user_id)
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl AggregateRoot for Ticket {
    type Id = TicketId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: OpenTicket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTicket {
    pub actor: Principal,
    pub ticket_id: TicketId,
    pub customer: ContactSnapshot,
    pub subject: String,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ResolveTicket. A blank response counts as no response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveTicket {
    pub actor: Principal,
    pub ticket_id: TicketId,
    pub response: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketCommand {
    OpenTicket(OpenTicket),
    ResolveTicket(ResolveTicket),
}

/// Event: TicketOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketOpened {
    pub ticket_id: TicketId,
    pub customer: ContactSnapshot,
    pub subject: String,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TicketResolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketResolved {
    pub ticket_id: TicketId,
    pub response: Option<String>,
    pub resolved_by: Principal,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketEvent {
    TicketOpened(TicketOpened),
    TicketResolved(TicketResolved),
}

impl Event for TicketEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TicketEvent::TicketOpened(_) => "support.ticket.opened",
            TicketEvent::TicketResolved(_) => "support.ticket.resolved",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            TicketEvent::TicketOpened(e) => e.occurred_at,
            TicketEvent::TicketResolved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Ticket {
    type Command = TicketCommand;
    type Event = TicketEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            TicketEvent::TicketOpened(e) => {
                self.id = e.ticket_id;
                self.customer = Some(e.customer.clone());
                self.subject = e.subject.clone();
                self.message = e.message.clone();
                self.status = TicketStatus::Open;
                self.created_at = Some(e.occurred_at);
                self.created = true;
            }
            TicketEvent::TicketResolved(e) => {
                self.status = TicketStatus::Resolved;
                self.response = e.response.clone();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            TicketCommand::OpenTicket(cmd) => self.handle_open(cmd),
            TicketCommand::ResolveTicket(cmd) => self.handle_resolve(cmd),
        }
    }
}

impl Ticket {
    fn handle_open(&self, cmd: &OpenTicket) -> Result<Vec<TicketEvent>, DomainError> {
        authorize(&cmd.actor, &Permission::TICKETS_OPEN)?;
        if cmd.customer.id != cmd.actor.user_id {
            return Err(DomainError::Unauthorized);
        }
        if self.created {
            return Err(DomainError::conflict("ticket already exists"));
        }
        if self.id != cmd.ticket_id {
            return Err(DomainError::invariant("ticket_id mismatch"));
        }

        let subject = cmd.subject.trim();
        let message = cmd.message.trim();
        if subject.is_empty() {
            return Err(DomainError::validation("ticket subject cannot be empty"));
        }
        if message.is_empty() {
            return Err(DomainError::validation("ticket message cannot be empty"));
        }

        Ok(vec![TicketEvent::TicketOpened(TicketOpened {
            ticket_id: cmd.ticket_id,
            customer: cmd.customer.clone(),
            subject: subject.to_string(),
            message: message.to_string(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_resolve(&self, cmd: &ResolveTicket) -> Result<Vec<TicketEvent>, DomainError> {
        authorize(&cmd.actor, &Permission::TICKETS_RESOLVE)?;
        if !self.created {
            return Err(DomainError::not_found("ticket"));
        }
        if self.id != cmd.ticket_id {
            return Err(DomainError::invariant("ticket_id mismatch"));
        }
        if self.status == TicketStatus::Resolved {
            return Err(DomainError::invariant("ticket is already resolved"));
        }

        let response = cmd
            .response
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        Ok(vec![TicketEvent::TicketResolved(TicketResolved {
            ticket_id: cmd.ticket_id,
            response,
            resolved_by: cmd.actor,
            occurred_at: cmd.occurred_at,
        })])
    }
}
