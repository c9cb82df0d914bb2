// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Lifetime-driven release of processes.
//!
//! A scheduled release is fire-and-forget: it sleeps, then takes the same
//! lock as every other caller. If the process was already removed it logs
//! `ProcessNotFound` and returns; if the engine was reset while it slept it
//! does nothing at all.

use crate::{DeallocationError, MemoryManager};
use address_space::ProcessId;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Outcome of a scheduled release. `None` means the engine was reset first.
pub type ReleaseOutcome = Option<Result<(), DeallocationError>>;

/// Spawns a task that deallocates `pid` after `lifetime`.
///
/// Must be called from within a tokio runtime.
pub fn schedule_release(
    manager: Arc<MemoryManager>,
    pid: ProcessId,
    lifetime: Duration,
) -> JoinHandle<ReleaseOutcome> {
    let epoch = manager.epoch();
    tracing::debug!("{pid}: release scheduled in {lifetime:?} (epoch {epoch})");

    tokio::spawn(async move {
        tokio::time::sleep(lifetime).await;
        let outcome = manager.deallocate_in_epoch(pid, epoch);
        match &outcome {
            Some(Ok(())) => tracing::info!("{pid}: released after lifetime expiration"),
            Some(Err(e)) => tracing::warn!("{pid}: scheduled release failed: {e}"),
            None => tracing::debug!("{pid}: scheduled release cancelled by reset"),
        }
        outcome
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocation_strategy::AllocationMethod;

    #[tokio::test(start_paused = true)]
    async fn test_release_after_lifetime() {
        let mm = Arc::new(MemoryManager::new(256, 16).unwrap());
        mm.allocate(ProcessId(1), 32, AllocationMethod::Paging).unwrap();

        let handle = schedule_release(Arc::clone(&mm), ProcessId(1), Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(mm.process(ProcessId(1)).is_some());

        assert_eq!(handle.await.unwrap(), Some(Ok(())));
        assert!(mm.process(ProcessId(1)).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_of_removed_process_reports_not_found() {
        let mm = Arc::new(MemoryManager::new(256, 16).unwrap());
        mm.allocate(ProcessId(1), 32, AllocationMethod::Paging).unwrap();

        let handle = schedule_release(Arc::clone(&mm), ProcessId(1), Duration::from_secs(1));
        mm.deallocate(ProcessId(1)).unwrap();

        assert_eq!(
            handle.await.unwrap(),
            Some(Err(DeallocationError::ProcessNotFound(ProcessId(1))))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_release() {
        let mm = Arc::new(MemoryManager::new(256, 16).unwrap());
        mm.allocate(ProcessId(1), 32, AllocationMethod::Paging).unwrap();
        let handle = schedule_release(Arc::clone(&mm), ProcessId(1), Duration::from_secs(1));

        mm.reset(256, 16).unwrap();
        mm.allocate(ProcessId(1), 64, AllocationMethod::Paging).unwrap();

        assert_eq!(handle.await.unwrap(), None);
        assert_eq!(mm.process(ProcessId(1)).map(|a| a.requested_size), Some(64));
    }
}
