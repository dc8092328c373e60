//! Single-slot ephemeral message with last-write-wins clearing.

/// Identifies one `show` call. A clear request only succeeds for the ticket
/// that is still current.
pub type ToastTicket = u64;

#[derive(Debug, Default)]
pub struct ToastSlot {
    current: Option<(ToastTicket, String)>,
    last_ticket: ToastTicket,
}

impl ToastSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any pending message.
    pub fn show(&mut self, message: &str) -> ToastTicket {
        self.last_ticket += 1;
        self.current = Some((self.last_ticket, message.to_string()));
        self.last_ticket
    }

    /// Clears the message if `ticket` is still the current one.
    pub fn expire(&mut self, ticket: ToastTicket) -> bool {
        match &self.current {
            Some((current, _)) if *current == ticket => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Clears unconditionally. Returns whether a message was showing.
    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.current.as_ref().map(|(_, msg)| msg.as_str())
    }
}
