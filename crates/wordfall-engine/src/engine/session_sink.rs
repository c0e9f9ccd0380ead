use serde::Serialize;

/// Opaque identifier a sink hands back from [`SessionSink::create_session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize)]
pub struct SessionId(u64);

impl SessionId {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Point-in-time view of a session, handed to the sink at checkpoints and at
/// session end.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub score: usize,
    pub level: usize,
    pub lines_cleared: usize,
    pub pieces_placed: usize,
    pub challenges_attempted: usize,
    pub challenges_completed: usize,
    pub duration_secs: u64,
}

/// A sink failure. Sinks are best-effort: the session reports the error and
/// plays on.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("session sink error: {message}")]
pub struct SinkError {
    message: String,
}

impl SinkError {
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Where session lifecycle events go: a database, a log file, or nowhere.
///
/// Every method is fallible, and every failure is non-fatal to gameplay; the
/// session counts failures and moves on.
pub trait SessionSink: std::fmt::Debug {
    /// Called once when a session starts.
    fn create_session(&mut self) -> Result<SessionId, SinkError>;

    /// Checkpoint after a scoring event.
    fn update_session(&mut self, id: SessionId, snapshot: &SessionSnapshot)
    -> Result<(), SinkError>;

    /// Final snapshot; called exactly once per started session.
    fn end_session(&mut self, id: SessionId, snapshot: &SessionSnapshot) -> Result<(), SinkError>;

    /// A submitted challenge answer and the points it earned.
    fn record_answer(
        &mut self,
        id: SessionId,
        challenge_id: &str,
        answer: &str,
        points: usize,
    ) -> Result<(), SinkError>;
}

/// Sink that records nothing. Sessions without persistence use this.
#[derive(Debug, Default)]
pub struct NullSink {
    next_id: u64,
}

impl SessionSink for NullSink {
    fn create_session(&mut self) -> Result<SessionId, SinkError> {
        self.next_id += 1;
        Ok(SessionId::new(self.next_id))
    }

    fn update_session(
        &mut self,
        _id: SessionId,
        _snapshot: &SessionSnapshot,
    ) -> Result<(), SinkError> {
        Ok(())
    }

    fn end_session(&mut self, _id: SessionId, _snapshot: &SessionSnapshot) -> Result<(), SinkError> {
        Ok(())
    }

    fn record_answer(
        &mut self,
        _id: SessionId,
        _challenge_id: &str,
        _answer: &str,
        _points: usize,
    ) -> Result<(), SinkError> {
        Ok(())
    }
}
