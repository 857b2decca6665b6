// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! ecd-jobs: the IoT Jobs listener state machine — next-job discovery,
//! acceptance, and version-aware status reporting.

pub mod listener;
pub mod protocol;
pub mod topics;
pub mod transport;

pub use listener::JobsListener;
pub use protocol::{
    DescribeNextJobRequest, DescribeNextJobResponse, ExecutionState, JobAction, JobExecution, JobStatus,
    UpdateJobRejected, UpdateJobRequest,
};
pub use topics::{JobsTopics, CLIENT_TOKEN};
pub use transport::{MqttEvent, MqttTransport};
