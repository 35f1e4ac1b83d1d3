//! Sentence embeddings for the knowledge base.
//!
//! Wraps the `sentence-transformers/all-MiniLM-L6-v2` model via candle and
//! exposes it behind `civkb_core::traits::Embedder`. A deterministic
//! hash-based `FakeEmbedder` is available for tests and development via
//! `APP_USE_FAKE_EMBEDDINGS=1`; both produce L2-normalized vectors of the
//! same dimensionality, so the rest of the pipeline cannot tell them apart.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use tokenizers::Tokenizer;

use civkb_core::traits::Embedder;

mod device;
mod pool;
mod tokenize;

pub use device::select_device;
pub use pool::masked_mean_l2;
pub use tokenize::tokenize_on_device;

/// Output dimensionality of all-MiniLM-L6-v2 (and of the fake embedder).
pub const EMBEDDING_DIM: usize = 384;

const MAX_LEN: usize = 256;

pub struct MiniLmEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
}

impl MiniLmEmbedder {
    pub fn new() -> Result<Self> {
        let device = select_device();
        println!("🔄 Loading all-MiniLM-L6-v2 from local files...");
        let model_dir = resolve_model_dir()?;

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config_path = model_dir.join("config.json");
        let config: BertConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;
        let dim = config.hidden_size;

        let weights_path = model_dir.join("model.safetensors");
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device)? };
        let model = BertModel::load(vb, &config)?;
        println!("✅ all-MiniLM-L6-v2 loaded (dim={})", dim);
        Ok(Self { model, tokenizer, device, dim })
    }

    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let (input_ids, attention_mask) =
            tokenize_on_device(&self.tokenizer, text, MAX_LEN, &self.device)?;
        let token_type_ids = Tensor::zeros((1, MAX_LEN), DType::U32, &self.device)?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let emb: Vec<f32> = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        if emb.len() != self.dim {
            return Err(anyhow!("pooled embedding has {} dims, expected {}", emb.len(), self.dim));
        }
        Ok(emb)
    }
}

impl Embedder for MiniLmEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }
    fn max_len(&self) -> usize {
        MAX_LEN
    }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_text(t)).collect()
    }
}

/// Deterministic stand-in embedder: hashes whitespace tokens into buckets
/// and L2-normalizes. Same text always yields the same vector, which makes
/// similarity tests exactly reproducible without model weights on disk.
pub struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }
    fn max_len(&self) -> usize {
        MAX_LEN
    }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

/// The same embedder must be used for ingest and query; callers construct
/// one through here so the switch to the fake model applies to both.
pub fn get_default_embedder() -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        println!("🧪 Using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::new(EMBEDDING_DIM)));
    }
    Ok(Box::new(MiniLmEmbedder::new()?))
}

fn resolve_model_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() {
            println!("📦 Using APP_MODEL_DIR: {}", p.display());
            return Ok(p);
        }
    }
    if let Ok(dir) = std::env::var("MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() {
            println!("📦 Using MODEL_DIR: {}", p.display());
            return Ok(p);
        }
    }
    let root = Path::new("../models/all-MiniLM-L6-v2");
    if root.exists() {
        println!("📦 Using model dir: {}", root.display());
        return Ok(root.to_path_buf());
    }
    let legacy = Path::new("models/all-MiniLM-L6-v2");
    if legacy.exists() {
        println!("📦 Using model dir: {}", legacy.display());
        return Ok(legacy.to_path_buf());
    }
    Err(anyhow!("Could not locate the all-MiniLM-L6-v2 model directory"))
}
