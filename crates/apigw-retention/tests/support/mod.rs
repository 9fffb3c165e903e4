//! In-memory AWS fakes shared by the integration tests
//!
//! Both fakes record every call so tests can assert exactly which remote
//! operations a run performed.

#![allow(dead_code)]

use apigw_log_retention::{
    ApiGatewayBackend, LogsBackend, RemoteError, RestApiPage, RestApiSummary, StageLogSettings,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// API Gateway holding a fixed list of REST APIs and stage settings.
#[derive(Default)]
pub struct FakeApiGateway {
    apis: Vec<RestApiSummary>,
    stages: HashMap<(String, String), StageLogSettings>,
    list_calls: Mutex<usize>,
    stage_calls: Mutex<Vec<(String, String)>>,
}

impl FakeApiGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api(mut self, id: &str, name: &str) -> Self {
        self.apis.push(RestApiSummary {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Pad the listing with unrelated APIs so lookups span several pages.
    pub fn with_filler(mut self, count: usize) -> Self {
        for i in 0..count {
            self.apis.push(RestApiSummary {
                id: format!("filler{}", i),
                name: format!("unrelated-{}", i),
            });
        }
        self
    }

    pub fn with_stage(
        mut self,
        rest_api_id: &str,
        stage: &str,
        destination_arn: Option<&str>,
    ) -> Self {
        self.stages.insert(
            (rest_api_id.to_string(), stage.to_string()),
            StageLogSettings {
                destination_arn: destination_arn.map(str::to_string),
            },
        );
        self
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    pub fn stage_calls(&self) -> Vec<(String, String)> {
        self.stage_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiGatewayBackend for FakeApiGateway {
    async fn get_rest_apis(
        &self,
        position: Option<String>,
        limit: i32,
    ) -> Result<RestApiPage, RemoteError> {
        *self.list_calls.lock().unwrap() += 1;

        let start = match position {
            Some(p) => p
                .parse::<usize>()
                .map_err(|_| RemoteError::call("GetRestApis", "bad position"))?,
            None => 0,
        };
        let end = (start + limit as usize).min(self.apis.len());

        Ok(RestApiPage {
            items: self.apis[start..end].to_vec(),
            position: (end < self.apis.len()).then(|| end.to_string()),
        })
    }

    async fn get_stage(
        &self,
        rest_api_id: &str,
        stage_name: &str,
    ) -> Result<StageLogSettings, RemoteError> {
        let key = (rest_api_id.to_string(), stage_name.to_string());
        self.stage_calls.lock().unwrap().push(key.clone());

        self.stages.get(&key).cloned().ok_or_else(|| {
            RemoteError::call("GetStage", "Invalid stage identifier specified")
        })
    }
}

/// CloudWatch Logs knowing a set of existing log groups.
#[derive(Default)]
pub struct FakeLogs {
    existing: HashSet<String>,
    pub puts: Mutex<Vec<(String, u32)>>,
    pub deletes: Mutex<Vec<String>>,
}

impl FakeLogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, name: &str) -> Self {
        self.existing.insert(name.to_string());
        self
    }

    pub fn puts(&self) -> Vec<(String, u32)> {
        self.puts.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.puts().len() + self.deletes().len()
    }

    fn check_exists(&self, log_group: &str) -> Result<(), RemoteError> {
        if self.existing.contains(log_group) {
            Ok(())
        } else {
            Err(RemoteError::LogGroupNotFound {
                log_group: log_group.to_string(),
            })
        }
    }
}

#[async_trait]
impl LogsBackend for FakeLogs {
    async fn put_retention_policy(&self, log_group: &str, days: u32) -> Result<(), RemoteError> {
        self.puts.lock().unwrap().push((log_group.to_string(), days));
        self.check_exists(log_group)
    }

    async fn delete_retention_policy(&self, log_group: &str) -> Result<(), RemoteError> {
        self.deletes.lock().unwrap().push(log_group.to_string());
        self.check_exists(log_group)
    }
}
