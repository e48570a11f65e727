//! 乱序服务
//!
//! 使用 Fisher-Yates 算法生成新的排列，不修改原序列

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Fisher-Yates 洗牌，返回新的序列
///
/// 从最后一个位置往前，每个位置 i 与 `[0, i]` 中均匀随机的位置交换
pub fn fisher_yates<T: Clone, R: Rng + ?Sized>(entries: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = entries.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}

/// 乱序引擎，持有随机源
pub struct ShuffleEngine<R = StdRng> {
    rng: R,
}

impl ShuffleEngine<StdRng> {
    /// 使用系统熵初始化
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// 固定种子，结果可复现
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for ShuffleEngine<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> ShuffleEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// 打乱序列
    pub fn shuffle<T: Clone>(&mut self, entries: &[T]) -> Vec<T> {
        debug!("打乱 {} 个元素", entries.len());
        fisher_yates(entries, &mut self.rng)
    }

    /// 按开关决定是否打乱
    ///
    /// 关闭时原样返回，不消耗随机数
    pub fn arrange<T: Clone>(&mut self, entries: &[T], enabled: bool) -> Vec<T> {
        if enabled {
            self.shuffle(entries)
        } else {
            entries.to_vec()
        }
    }

    #[cfg(test)]
    fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}
