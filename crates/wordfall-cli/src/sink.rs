use std::{
    fs::{File, OpenOptions},
    io::Write as _,
    path::Path,
};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::Serialize;
use wordfall_engine::{SessionId, SessionSink, SessionSnapshot, SinkError};

/// One line of the session log.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum SessionEvent<'a> {
    SessionStarted {
        session_id: SessionId,
        at: DateTime<Utc>,
    },
    SessionUpdated {
        session_id: SessionId,
        at: DateTime<Utc>,
        #[serde(flatten)]
        snapshot: &'a SessionSnapshot,
    },
    SessionEnded {
        session_id: SessionId,
        at: DateTime<Utc>,
        #[serde(flatten)]
        snapshot: &'a SessionSnapshot,
    },
    AnswerRecorded {
        session_id: SessionId,
        at: DateTime<Utc>,
        challenge_id: &'a str,
        answer: &'a str,
        points: usize,
    },
}

/// Session sink appending one JSON object per event to a log file.
#[derive(Debug)]
pub struct JsonlSink {
    file: File,
    next_id: u64,
}

impl JsonlSink {
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open session log {}", path.display()))?;
        Ok(Self { file, next_id: 0 })
    }

    fn write_event(&mut self, event: &SessionEvent<'_>) -> Result<(), SinkError> {
        let line = serde_json::to_string(event).map_err(SinkError::new)?;
        writeln!(self.file, "{line}").map_err(SinkError::new)
    }
}

impl SessionSink for JsonlSink {
    fn create_session(&mut self) -> Result<SessionId, SinkError> {
        self.next_id += 1;
        let id = SessionId::new(self.next_id);
        self.write_event(&SessionEvent::SessionStarted {
            session_id: id,
            at: Utc::now(),
        })?;
        Ok(id)
    }

    fn update_session(
        &mut self,
        id: SessionId,
        snapshot: &SessionSnapshot,
    ) -> Result<(), SinkError> {
        self.write_event(&SessionEvent::SessionUpdated {
            session_id: id,
            at: Utc::now(),
            snapshot,
        })
    }

    fn end_session(&mut self, id: SessionId, snapshot: &SessionSnapshot) -> Result<(), SinkError> {
        self.write_event(&SessionEvent::SessionEnded {
            session_id: id,
            at: Utc::now(),
            snapshot,
        })
    }

    fn record_answer(
        &mut self,
        id: SessionId,
        challenge_id: &str,
        answer: &str,
        points: usize,
    ) -> Result<(), SinkError> {
        self.write_event(&SessionEvent::AnswerRecorded {
            session_id: id,
            at: Utc::now(),
            challenge_id,
            answer,
            points,
        })
    }
}
