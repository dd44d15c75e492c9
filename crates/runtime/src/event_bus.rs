/// One recorded pipeline transition.
///
/// `generation` is the request generation the event belongs to, so a trace
/// can be grouped per user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub generation: u64,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
    capacity: Option<usize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            capacity: None,
        }
    }

    /// Keeps at most `capacity` events, dropping the oldest first.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            capacity: Some(capacity.max(1)),
        }
    }

    pub fn emit(&mut self, generation: u64, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            generation,
            kind,
            message: message.into(),
        });
        if let Some(cap) = self.capacity {
            if self.events.len() > cap {
                let excess = self.events.len() - cap;
                self.events.drain(..excess);
            }
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
