use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

use super::ChartPipelineConfig;

pub const PIPELINE_CONFIG_JSON_SCHEMA_V1: u32 = 1;

/// Versioned envelope for persisted pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPipelineConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: ChartPipelineConfig,
}

impl ChartPipelineConfig {
    /// Parses and validates a bare config document.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse pipeline config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to serialize pipeline config json: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartPipelineConfigJsonContractV1 {
            schema_version: PIPELINE_CONFIG_JSON_SCHEMA_V1,
            config: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidConfig(format!(
                "failed to serialize pipeline config contract v1: {e}"
            ))
        })
    }

    /// Accepts either a bare config or a v1 envelope.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        let value: serde_json::Value = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse pipeline config json: {e}"))
        })?;
        if value.get("schema_version").is_none() {
            return Self::from_json_str(input);
        }

        let payload: ChartPipelineConfigJsonContractV1 =
            serde_json::from_value(value).map_err(|e| {
                ChartError::InvalidConfig(format!(
                    "failed to parse pipeline config json payload: {e}"
                ))
            })?;
        if payload.schema_version != PIPELINE_CONFIG_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidConfig(format!(
                "unsupported pipeline config schema version: {}",
                payload.schema_version
            )));
        }
        payload.config.validate()?;
        Ok(payload.config)
    }
}
