//! Background parse worker.
//!
//! Dataset parsing runs on a dedicated thread so callers stay responsive
//! while large exports (tens of thousands of rows) are processed. The
//! protocol is one reply per request: a caller submits
//! [`ParseRequest`]s and receives [`ParseReply`]s correlated by a
//! monotonically increasing request id, so stale replies from superseded
//! requests can be discarded.

use std::{
    panic::{self, AssertUnwindSafe},
    sync::mpsc::{self, Receiver, Sender},
    thread::{self, JoinHandle},
};

use log::{debug, warn};

use skillgraph_core::dataset::DatasetKind;
use skillgraph_parser::{DatasetPayload, parse_dataset};

use crate::error::SkillGraphError;

/// Correlation id assigned to each request in submission order.
pub type RequestId = u64;

/// A parse request submitted to the worker.
#[derive(Debug)]
pub struct ParseRequest {
    pub id: RequestId,
    pub kind: DatasetKind,
    pub csv_text: String,
}

/// The reply for one request.
///
/// Exactly one reply is produced per request. Failures (including panics
/// inside the parser) arrive as `success: false` payloads, never as a
/// missing reply.
#[derive(Debug)]
pub struct ParseReply {
    pub id: RequestId,
    pub payload: DatasetPayload,
}

/// Handle to the background parse worker thread.
///
/// Dropping the handle closes the request channel, which stops the worker;
/// the thread is joined during drop.
pub struct ParseWorker {
    requests: Option<Sender<ParseRequest>>,
    replies: Receiver<ParseReply>,
    handle: Option<JoinHandle<()>>,
    next_id: RequestId,
}

impl ParseWorker {
    /// Spawns the worker thread.
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = mpsc::channel::<ParseRequest>();
        let (reply_tx, reply_rx) = mpsc::channel::<ParseReply>();

        let handle = thread::Builder::new()
            .name("skillgraph-parse".to_string())
            .spawn(move || worker_loop(request_rx, reply_tx))
            .expect("failed to spawn parse worker thread");

        Self {
            requests: Some(request_tx),
            replies: reply_rx,
            handle: Some(handle),
            next_id: 0,
        }
    }

    /// Submits a dataset for parsing and returns its correlation id.
    ///
    /// Requests for different datasets may be in flight concurrently; each
    /// produces an independent reply.
    pub fn submit(
        &mut self,
        kind: DatasetKind,
        csv_text: String,
    ) -> Result<RequestId, SkillGraphError> {
        let id = self.next_id;
        self.next_id += 1;

        let sender = self
            .requests
            .as_ref()
            .expect("request sender lives until drop");
        sender
            .send(ParseRequest { id, kind, csv_text })
            .map_err(|_| SkillGraphError::Worker("parse worker is no longer running".to_string()))?;

        debug!(request_id = id, dataset = kind.to_string(); "Submitted parse request");
        Ok(id)
    }

    /// Blocks until the next reply arrives.
    pub fn recv(&self) -> Result<ParseReply, SkillGraphError> {
        self.replies
            .recv()
            .map_err(|_| SkillGraphError::Worker("parse worker stopped before replying".to_string()))
    }

    /// Returns the next reply if one is already available.
    pub fn try_recv(&self) -> Option<ParseReply> {
        self.replies.try_recv().ok()
    }
}

impl Drop for ParseWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        drop(self.requests.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Parse worker thread panicked during shutdown");
            }
        }
    }
}

fn worker_loop(requests: Receiver<ParseRequest>, replies: Sender<ParseReply>) {
    for request in requests {
        let ParseRequest { id, kind, csv_text } = request;

        // The parse call must never take the worker down with it; a panic
        // becomes an ordinary failure payload.
        let payload = panic::catch_unwind(AssertUnwindSafe(|| parse_dataset(kind, &csv_text)))
            .unwrap_or_else(|_| {
                warn!(request_id = id, dataset = kind.to_string(); "Parser panicked");
                DatasetPayload::failure(kind, "parser panicked while processing dataset")
            });

        if replies.send(ParseReply { id, payload }).is_err() {
            // Reply receiver is gone; nothing left to do.
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_reply_per_request() {
        let mut worker = ParseWorker::spawn();

        let first = worker
            .submit(DatasetKind::Occupations, "ID,NAME\n1,a\n".to_string())
            .unwrap();
        let second = worker
            .submit(DatasetKind::Skills, "ID,NAME\n2,b\n3,c\n".to_string())
            .unwrap();
        assert_ne!(first, second);

        let mut replies = vec![worker.recv().unwrap(), worker.recv().unwrap()];
        replies.sort_by_key(|reply| reply.id);

        assert_eq!(replies[0].id, first);
        assert_eq!(replies[0].payload.kind, DatasetKind::Occupations);
        assert_eq!(replies[0].payload.records.len(), 1);

        assert_eq!(replies[1].id, second);
        assert_eq!(replies[1].payload.records.len(), 2);
    }

    #[test]
    fn test_stale_replies_are_identifiable() {
        let mut worker = ParseWorker::spawn();

        let stale = worker
            .submit(DatasetKind::Skills, "ID,NAME\n1,old\n".to_string())
            .unwrap();
        let latest = worker
            .submit(DatasetKind::Skills, "ID,NAME\n1,new\n".to_string())
            .unwrap();

        let mut kept = None;
        for _ in 0..2 {
            let reply = worker.recv().unwrap();
            if reply.id == latest {
                kept = Some(reply);
            } else {
                assert_eq!(reply.id, stale);
            }
        }

        let kept = kept.expect("latest reply must arrive");
        assert_eq!(kept.payload.records[0].get("NAME"), Some("new"));
    }

    #[test]
    fn test_failure_payload_crosses_the_boundary() {
        let mut worker = ParseWorker::spawn();

        worker
            .submit(DatasetKind::Occupations, "\"ID\"x,NAME\n1,a\n".to_string())
            .unwrap();
        let reply = worker.recv().unwrap();

        assert!(!reply.payload.success);
        assert!(reply.payload.records.is_empty());
        assert!(reply.payload.error.is_some());
    }

    #[test]
    fn test_recv_after_shutdown_reports_worker_error() {
        let mut worker = ParseWorker::spawn();

        // Closing the request channel ends the worker loop, which drops the
        // reply sender.
        drop(worker.requests.take());

        let err = worker.recv().unwrap_err();
        assert!(matches!(err, SkillGraphError::Worker(_)));
    }
}
