//! Allocator trait.
//!
//! An allocator turns a schedule request into a schedule. The real work is
//! done by an external engine; implementations only move the documents.

use async_trait::async_trait;

use crate::{Result, ScheduleRequest, ScheduleResponse};

#[async_trait]
pub trait Allocator: Send + Sync {
    /// Name of this allocator backend (e.g., "plugin").
    fn name(&self) -> &'static str;

    /// Schedule the bookings in `request`.
    async fn allocate(&self, request: &ScheduleRequest) -> Result<ScheduleResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestBuilder;
    use serde_json::json;

    /// Echoes each booking back as a job.
    struct EchoAllocator;

    #[async_trait]
    impl Allocator for EchoAllocator {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn allocate(&self, request: &ScheduleRequest) -> Result<ScheduleResponse> {
            let jobs = request
                .unscheduled_bookings
                .iter()
                .flat_map(|b| &b.parts)
                .map(|d| json!({"PartName": d.part, "Cycles": d.quantity, "ScheduleId": "echo"}))
                .collect();
            Ok(ScheduleResponse {
                jobs,
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_allocator_object() {
        let allocator: Box<dyn Allocator> = Box::new(EchoAllocator);
        let request = RequestBuilder::new(json!({}))
            .add_part("aaa", Some(3))
            .build()
            .unwrap();

        let response = allocator.allocate(&request).await.unwrap();
        assert_eq!(allocator.name(), "echo");
        assert_eq!(response.jobs[0]["Cycles"], 3);
        assert_eq!(response.schedule_id(), Some("echo"));
    }
}
