use civkb_core::traits::Embedder;
use civkb_embed::get_default_embedder;

fn main() -> anyhow::Result<()> {
    let embedder = get_default_embedder()?;
    let texts = vec!["hello world".to_string(), "citizens assembly".to_string()];
    let embs = embedder.embed_batch(&texts)?;
    println!("B={} dim={}", embs.len(), embedder.dim());
    Ok(())
}
