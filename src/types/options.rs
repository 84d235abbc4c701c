//! Model sampling options shared by generate, chat and embeddings.

use serde::{Deserialize, Serialize};

/// Runtime options forwarded to the model (`options` on the wire).
///
/// Unset fields are omitted so the server's Modelfile defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Mirostat sampling mode (0 = off, 1 = Mirostat, 2 = Mirostat 2.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirostat: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirostat_eta: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirostat_tau: Option<f32>,

    /// Context window size in tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_ctx: Option<u32>,

    /// How far back the model looks to prevent repetition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_last_n: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_penalty: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    /// Stop sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,

    /// Tail free sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tfs_z: Option<f32>,

    /// Maximum number of tokens to predict (-1 = infinite).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_p: Option<f32>,
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Mirostat sampling mode.
    pub fn mirostat(mut self, mode: u8) -> Self {
        self.mirostat = Some(mode);
        self
    }

    /// Set the Mirostat learning rate.
    pub fn mirostat_eta(mut self, eta: f32) -> Self {
        self.mirostat_eta = Some(eta);
        self
    }

    /// Set the Mirostat target entropy.
    pub fn mirostat_tau(mut self, tau: f32) -> Self {
        self.mirostat_tau = Some(tau);
        self
    }

    /// Set the context window size.
    pub fn num_ctx(mut self, tokens: u32) -> Self {
        self.num_ctx = Some(tokens);
        self
    }

    pub fn repeat_last_n(mut self, n: i32) -> Self {
        self.repeat_last_n = Some(n);
        self
    }

    pub fn repeat_penalty(mut self, penalty: f32) -> Self {
        self.repeat_penalty = Some(penalty);
        self
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set seed for deterministic generation.
    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the stop sequence.
    pub fn stop(mut self, stop: impl Into<String>) -> Self {
        self.stop = Some(stop.into());
        self
    }

    pub fn tfs_z(mut self, z: f32) -> Self {
        self.tfs_z = Some(z);
        self
    }

    /// Set the maximum number of tokens to predict.
    pub fn num_predict(mut self, n: i32) -> Self {
        self.num_predict = Some(n);
        self
    }

    /// Set top-k sampling.
    pub fn top_k(mut self, k: u32) -> Self {
        self.top_k = Some(k);
        self
    }

    /// Set top_p.
    pub fn top_p(mut self, p: f32) -> Self {
        self.top_p = Some(p);
        self
    }

    pub fn min_p(mut self, p: f32) -> Self {
        self.min_p = Some(p);
        self
    }
}
