// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

pub mod braid_task_tests;
pub mod cancellation_token_tests;
pub mod closable_queue_tests;
pub mod multi_consumer_queue_tests;
