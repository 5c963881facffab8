//! Many-to-one candidate funnel.
//!
//! Every local aggregator holds a [`FunnelSender`]; the single global merger holds
//! the one [`FunnelReceiver`]. The stream is one-directional: producers never
//! observe the merger. The receiver's iteration ends once every sender has been
//! dropped, which is how the merger learns the candidate stream is complete.

use crate::scored::Candidate;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// Create a connected sender/receiver pair.
///
/// The channel is unbounded so that a producer can finish its partition even
/// when the merger runs on the same thread after all producers.
#[must_use]
pub fn funnel<I>() -> (FunnelSender<I>, FunnelReceiver<I>) {
    let (tx, rx) = unbounded();
    (FunnelSender { tx }, FunnelReceiver { rx })
}

/// Producer side, cloned once per partition.
#[derive(Debug)]
pub struct FunnelSender<I> {
    tx: Sender<Candidate<I>>,
}

impl<I> Clone for FunnelSender<I> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<I> FunnelSender<I> {
    /// Send one candidate. Returns `false` if the receiver is gone.
    pub fn send(&self, candidate: Candidate<I>) -> bool {
        self.tx.send(candidate).is_ok()
    }

    /// Send every candidate in order; returns how many were delivered.
    pub fn send_all(&self, candidates: impl IntoIterator<Item = Candidate<I>>) -> usize {
        let mut sent = 0;
        for c in candidates {
            if !self.send(c) {
                break;
            }
            sent += 1;
        }
        sent
    }
}

/// Consumer side; there is exactly one.
#[derive(Debug)]
pub struct FunnelReceiver<I> {
    rx: Receiver<Candidate<I>>,
}

impl<I> FunnelReceiver<I> {
    /// Candidates that are already queued, without waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl<I> IntoIterator for FunnelReceiver<I> {
    type Item = Candidate<I>;
    type IntoIter = crossbeam_channel::IntoIter<Candidate<I>>;

    /// Blocks for each candidate; ends when every sender has been dropped.
    fn into_iter(self) -> Self::IntoIter {
        self.rx.into_iter()
    }
}
