/// Hands out increasing request numbers so late replies can be recognised.
///
/// Only a reply tagged with the most recently issued number is current;
/// everything older belongs to input the user has already moved past.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next number. Every earlier number becomes stale.
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.latest
    }

    #[cfg(test)]
    pub fn latest(&self) -> u64 {
        self.latest
    }
}
