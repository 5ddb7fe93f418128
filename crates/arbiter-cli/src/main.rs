use std::collections::VecDeque;

use rand::Rng;
use serde_json::json;
use tracing::info;

use arbiter_core::EngineBuilder;
use arbiter_core::impls::ErrorKeyScorer;

/// デモ：2種類のリクエストを2つの処理系へルーティングしながら学習する。
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // (A) エンジンを組み立てる
    let mut engine = EngineBuilder::new(["fast_path", "thorough_path"])
        .feature_dim(16)
        .exploration_alpha(1.0)
        .reward_scorer(ErrorKeyScorer::default())
        .build()?;

    // (B) 逐次フィードバックで学習させる
    // Small requests do best on the fast path, large batches on the
    // thorough one. The engine only ever sees the reward signal.
    let mut rng = rand::thread_rng();
    let window = 20;
    let mut recent: VecDeque<f64> = VecDeque::new();

    for trial in 0..200u32 {
        let is_small = rng.gen_bool(0.5);
        let state = if is_small {
            json!("small interactive request")
        } else {
            json!("large batch request")
        };
        let optimal = if is_small { "fast_path" } else { "thorough_path" };

        let choice = engine.decide(&state)?;
        let reward = if choice == optimal { 1.0 } else { 0.0 };
        engine.record_feedback(&json!({ "result": "ok" }), Some(reward), None)?;

        recent.push_back(reward);
        if recent.len() > window {
            recent.pop_front();
        }
        if (trial + 1) % 50 == 0 {
            let accuracy: f64 = recent.iter().sum::<f64>() / recent.len() as f64;
            info!(trial = trial + 1, accuracy, "rolling routing accuracy");
        }
    }

    // (C) 非同期フィードバック：event_id で後から結果を返す
    let action = engine.decide(&json!({
        "value": "large batch request",
        "event_id": "req-001",
    }))?;
    info!(action, "dispatched req-001, feedback arrives later");
    // reward is computed by the scorer: an error marker means penalty
    engine.record_feedback(&json!({ "error": "timeout" }), None, Some("req-001"))?;

    // (D) トレイル完了：多段の決定に減衰付きで報酬を配る
    for step in ["plan", "execute", "verify"] {
        engine.decide(&json!({ "value": step, "trace_id": "job-42" }))?;
    }
    engine.complete_trace("job-42", 1.0, 0.5)?;
    info!(
        experience = engine.experience_len(),
        "trace job-42 completed, decayed rewards recorded"
    );

    // (E) ポリシーを保存して読み戻す
    let path = std::env::temp_dir().join("arbiter-demo-policy");
    engine.save_policy(&path)?;
    engine.load_policy(&path)?;
    info!(path = %path.display(), "policy snapshot round-tripped");

    Ok(())
}
