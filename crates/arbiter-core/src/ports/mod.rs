//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部コラボレータ（埋め込みモデル、報酬計算、経験ストア）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - ポリシー本体はどのポートにも依存しない（決定経路は純粋な計算のみ）
//! - 経験ストアは記録専用（選択には一切使わない）
//! - 報酬計算は feedback が明示的な報酬を持たないときだけ呼ばれる

pub mod clock;
pub mod encoder;
pub mod reward;
pub mod store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::encoder::Encoder;
pub use self::reward::RewardScorer;
pub use self::store::ExperienceStore;
