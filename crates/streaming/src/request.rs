/// Identifies one issued metrics request.
///
/// Generations grow monotonically; a response is only applied when it carries
/// the latest generation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Request(pub u64);

#[derive(Debug, Default, Clone)]
pub struct RequestGenerations {
    latest: u64,
}

impl RequestGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new generation, superseding every earlier one.
    pub fn issue(&mut self) -> Request {
        self.latest = self.latest.wrapping_add(1);
        Request(self.latest)
    }

    /// Supersedes every outstanding request without issuing a new one.
    pub fn invalidate(&mut self) {
        self.latest = self.latest.wrapping_add(1);
    }

    pub fn latest(&self) -> Request {
        Request(self.latest)
    }

    pub fn is_current(&self, req: Request) -> bool {
        req.0 == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::RequestGenerations;

    #[test]
    fn only_latest_is_current() {
        let mut g = RequestGenerations::new();
        let a = g.issue();
        let b = g.issue();
        assert!(a < b);
        assert!(!g.is_current(a));
        assert!(g.is_current(b));
    }

    #[test]
    fn invalidate_supersedes_outstanding() {
        let mut g = RequestGenerations::new();
        let a = g.issue();
        g.invalidate();
        assert!(!g.is_current(a));
        let b = g.issue();
        assert!(g.is_current(b));
        assert_eq!(g.latest(), b);
    }
}
