use std::thread;

use crossbeam::channel::{self, Receiver, Sender};
use log::error;
use thiserror::Error;

use infisuggest_common::i_debug;
use infisuggest_search::{PhraseSuggestion, SuggestResult};

use crate::Suggester;

#[derive(Debug, Error)]
#[error("all suggestion workers stopped before answering every query")]
pub struct WorkersDisconnected;

pub struct Worker {
    pub id: usize,
    pub join_handle: thread::JoinHandle<()>,
}

struct MainToWorkerMessage {
    query_idx: usize,
    query: String,
}

struct WorkerToMainMessage {
    id: usize,
    query_idx: usize,
    result: SuggestResult<PhraseSuggestion>,
}

fn worker(id: usize, suggester: Suggester, sndr: Sender<WorkerToMainMessage>, rcvr: Receiver<MainToWorkerMessage>) {
    // The channel disconnects once the pool is terminated
    while let Ok(MainToWorkerMessage { query_idx, query }) = rcvr.recv() {
        let result = suggester.suggest(&query);
        if sndr.send(WorkerToMainMessage { id, query_idx, result }).is_err() {
            break;
        }
    }

    i_debug!("Worker {} terminating", id);
}

/// Answers independent suggestion queries on a fixed set of threads.
pub struct WorkerPool {
    workers: Vec<Worker>,
    tx_main: Sender<MainToWorkerMessage>,
    rx_main: Receiver<WorkerToMainMessage>,
    max_in_flight: usize,
}

impl WorkerPool {
    pub fn new(num_threads: usize, suggester: &Suggester) -> Self {
        let num_threads = num_threads.max(1);
        let max_in_flight = num_threads * 2;

        let (tx_worker, rx_main): (
            Sender<WorkerToMainMessage>, Receiver<WorkerToMainMessage>
        ) = channel::bounded(max_in_flight);
        let (tx_main, rx_worker): (
            Sender<MainToWorkerMessage>, Receiver<MainToWorkerMessage>
        ) = channel::bounded(max_in_flight);

        let mut workers = Vec::with_capacity(num_threads);
        for id in 0..num_threads {
            let suggester_clone = suggester.clone();
            let tx_worker_clone = tx_worker.clone();
            let rx_worker_clone = rx_worker.clone();

            workers.push(Worker {
                id,
                join_handle: thread::spawn(move || worker(id, suggester_clone, tx_worker_clone, rx_worker_clone)),
            });
        }

        WorkerPool { workers, tx_main, rx_main, max_in_flight }
    }

    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Suggestions for every query, in the order of `queries`.
    ///
    /// At most `max_in_flight` queries are queued at a time, so neither side blocks on a full channel.
    pub fn suggest_all(&self, queries: &[String]) -> Result<Vec<SuggestResult<PhraseSuggestion>>, WorkersDisconnected> {
        let mut results: Vec<Option<SuggestResult<PhraseSuggestion>>> = (0..queries.len()).map(|_| None).collect();
        let mut next_query = 0;
        let mut in_flight = 0;

        while next_query < queries.len() || in_flight > 0 {
            while next_query < queries.len() && in_flight < self.max_in_flight {
                let message = MainToWorkerMessage {
                    query_idx: next_query,
                    query: queries[next_query].clone(),
                };
                self.tx_main.send(message).map_err(|_| WorkersDisconnected)?;
                next_query += 1;
                in_flight += 1;
            }

            let answer = self.rx_main.recv().map_err(|_| WorkersDisconnected)?;
            i_debug!("Worker {} answered query {}", answer.id, answer.query_idx);
            results[answer.query_idx] = Some(answer.result);
            in_flight -= 1;
        }

        results.into_iter().map(|result| result.ok_or(WorkersDisconnected)).collect()
    }

    pub fn terminate(self) {
        drop(self.tx_main);

        for worker in self.workers {
            if worker.join_handle.join().is_err() {
                error!("Suggestion worker {} panicked", worker.id);
            }
        }
    }
}
