//! In-memory stand-ins for every external collaborator, used by unit and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;

use crate::auth::{AuthError, IdentityProvider, SessionClaims};
use crate::creations::store::CreationStore;
use crate::llm_client::ChatModel;
use crate::media::clipdrop::ImageSynthesizer;
use crate::media::cloudinary::{HostedImage, ImageHost};
use crate::media::pdf::PdfReader;
use crate::models::creation::{CreationRow, NewCreation};
use crate::state::AppState;
use crate::vendor::VendorError;

// ────────────────────────────────────────────────────────────────────────────
// Identity
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeIdentity {
    sessions: HashMap<String, SessionClaims>,
    usage: Mutex<HashMap<String, u32>>,
    writes: Mutex<Vec<(String, u32)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

fn clerk_outage() -> AuthError {
    AuthError::Upstream(VendorError::Api {
        vendor: "Clerk",
        status: 503,
        message: "service unavailable".to_string(),
    })
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(mut self, token: &str, user_id: &str, pla: Option<&str>, free_usage: u32) -> Self {
        self.sessions.insert(
            token.to_string(),
            SessionClaims {
                sub: user_id.to_string(),
                pla: pla.map(String::from),
            },
        );
        self.usage
            .lock()
            .unwrap()
            .insert(user_id.to_string(), free_usage);
        self
    }

    pub fn fail_usage_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_counter_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn counter_writes(&self) -> Vec<(String, u32)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn verify_session(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.sessions
            .get(token)
            .cloned()
            .ok_or_else(|| AuthError::InvalidToken("unknown session".to_string()))
    }

    async fn free_usage(&self, user_id: &str) -> Result<u32, AuthError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(clerk_outage());
        }
        Ok(self.usage.lock().unwrap().get(user_id).copied().unwrap_or(0))
    }

    async fn set_free_usage(&self, user_id: &str, count: u32) -> Result<(), AuthError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(clerk_outage());
        }
        self.writes
            .lock()
            .unwrap()
            .push((user_id.to_string(), count));
        self.usage
            .lock()
            .unwrap()
            .insert(user_id.to_string(), count);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Vendors
// ────────────────────────────────────────────────────────────────────────────

pub struct FakeChat {
    reply: Result<String, (u16, String)>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl FakeChat {
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, VendorError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_tokens));
        self.reply.clone().map_err(|(status, message)| VendorError::Api {
            vendor: "Gemini",
            status,
            message,
        })
    }
}

#[derive(Default)]
pub struct FakeSynth {
    failure: Option<(u16, String)>,
    calls: AtomicUsize,
}

impl FakeSynth {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSynthesizer for FakeSynth {
    async fn text_to_image(&self, _prompt: &str) -> Result<Bytes, VendorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((status, message)) = &self.failure {
            return Err(VendorError::Api {
                vendor: "ClipDrop",
                status: *status,
                message: message.clone(),
            });
        }
        Ok(Bytes::from_static(b"\x89PNG\r\n\x1a\n"))
    }
}

#[derive(Default)]
pub struct FakeHost {
    failure: Option<(u16, String)>,
    uploads: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeHost {
    /// `(data_url, transformation)` per upload, in call order.
    pub fn uploads(&self) -> Vec<(String, Option<String>)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageHost for FakeHost {
    async fn upload(
        &self,
        data_url: String,
        transformation: Option<&str>,
    ) -> Result<HostedImage, VendorError> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((data_url, transformation.map(String::from)));
        if let Some((status, message)) = &self.failure {
            return Err(VendorError::Api {
                vendor: "Cloudinary",
                status: *status,
                message: message.clone(),
            });
        }
        let public_id = format!("upload_{}", uploads.len());
        Ok(HostedImage {
            secure_url: format!("https://cdn.test/demo/{public_id}.png"),
            public_id,
        })
    }

    fn transformed_url(&self, public_id: &str, transformation: &str) -> String {
        format!("https://cdn.test/demo/{transformation}/{public_id}")
    }
}

pub struct FakePdf {
    text: Result<String, String>,
    calls: AtomicUsize,
}

impl FakePdf {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PdfReader for FakePdf {
    async fn extract_text(&self, _pdf: Bytes) -> Result<String, VendorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text.clone().map_err(VendorError::Pdf)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Persistence
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<CreationRow>>,
    fail_inserts: AtomicBool,
}

impl MemoryStore {
    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }


    pub fn rows(&self) -> Vec<CreationRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl CreationStore for MemoryStore {
    async fn insert(&self, creation: NewCreation) -> Result<CreationRow, sqlx::Error> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        let mut rows = self.rows.lock().unwrap();
        let row = CreationRow {
            id: rows.len() as i64 + 1,
            user_id: creation.user_id,
            prompt: creation.prompt,
            content: creation.content,
            kind: creation.kind,
            publish: creation.publish,
            likes: Vec::new(),
            created_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<CreationRow>, sqlx::Error> {
        Ok(self
            .rows()
            .into_iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .collect())
    }

    async fn list_published(&self) -> Result<Vec<CreationRow>, sqlx::Error> {
        Ok(self.rows().into_iter().rev().filter(|r| r.publish).collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Harness
// ────────────────────────────────────────────────────────────────────────────

/// Owns one of each fake and hands out an `AppState` wired to them.
pub struct Harness {
    pub identity: Arc<FakeIdentity>,
    pub chat: Arc<FakeChat>,
    pub synth: Arc<FakeSynth>,
    pub host: Arc<FakeHost>,
    pub pdf: Arc<FakePdf>,
    pub store: Arc<MemoryStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            identity: Arc::new(FakeIdentity::new()),
            chat: Arc::new(FakeChat {
                reply: Ok("generated text".to_string()),
                calls: Mutex::new(Vec::new()),
            }),
            synth: Arc::new(FakeSynth::default()),
            host: Arc::new(FakeHost::default()),
            pdf: Arc::new(FakePdf {
                text: Ok("resume text".to_string()),
                calls: AtomicUsize::new(0),
            }),
            store: Arc::new(MemoryStore::default()),
        }
    }

    pub fn with_identity(mut self, identity: FakeIdentity) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    pub fn with_chat_reply(mut self, reply: &str) -> Self {
        self.chat = Arc::new(FakeChat {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        });
        self
    }

    pub fn with_chat_error(mut self, status: u16, message: &str) -> Self {
        self.chat = Arc::new(FakeChat {
            reply: Err((status, message.to_string())),
            calls: Mutex::new(Vec::new()),
        });
        self
    }

    pub fn with_pdf_text(mut self, text: &str) -> Self {
        self.pdf = Arc::new(FakePdf {
            text: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        });
        self
    }

    pub fn with_pdf_error(mut self, message: &str) -> Self {
        self.pdf = Arc::new(FakePdf {
            text: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        });
        self
    }

    pub fn with_synth_error(mut self, status: u16, message: &str) -> Self {
        self.synth = Arc::new(FakeSynth {
            failure: Some((status, message.to_string())),
            calls: AtomicUsize::new(0),
        });
        self
    }

    pub fn with_host_error(mut self, status: u16, message: &str) -> Self {
        self.host = Arc::new(FakeHost {
            failure: Some((status, message.to_string())),
            uploads: Mutex::new(Vec::new()),
        });
        self
    }

    pub fn state(&self) -> AppState {
        AppState {
            creations: self.store.clone(),
            identity: self.identity.clone(),
            llm: self.chat.clone(),
            images: self.synth.clone(),
            image_host: self.host.clone(),
            pdf: self.pdf.clone(),
        }
    }
}
