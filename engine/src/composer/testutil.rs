#![cfg(test)]

use crate::lm::{MemoryLanguageModel, Unigram};

/// Shared stub model for composer tests.
///
/// A small pinyin-like syllabary with scores shaped like log probabilities,
/// so multi-syllable entries genuinely compete with their single-syllable
/// pieces.
pub fn test_model() -> MemoryLanguageModel {
    let mut lm = MemoryLanguageModel::new();
    lm.insert("gao", Unigram::new("高", -2.9));
    lm.insert("gao", Unigram::new("膏", -5.1));
    lm.insert("ke", Unigram::new("科", -3.0));
    lm.insert("ke", Unigram::new("课", -3.3));
    lm.insert("ji", Unigram::new("技", -3.1));
    lm.insert("xin", Unigram::new("新", -3.0));
    lm.insert("gao-ke", Unigram::new("高科", -5.5));
    lm.insert("ke-ji", Unigram::new("科技", -5.4));
    lm.insert("gao-ke-ji", Unigram::new("高科技", -6.0));
    lm
}

/// Denser model where many windows have entries, for exercising the search
/// against brute-force enumeration.
pub fn dense_model() -> MemoryLanguageModel {
    let mut lm = MemoryLanguageModel::new();
    lm.insert("zhong", Unigram::new("中", -3.2));
    lm.insert("zhong", Unigram::new("鐘", -4.0));
    lm.insert("guo", Unigram::new("國", -3.1));
    lm.insert("guo", Unigram::new("果", -3.9));
    lm.insert("ren", Unigram::new("人", -2.8));
    lm.insert("min", Unigram::new("民", -3.4));
    lm.insert("zhong-guo", Unigram::new("中國", -5.2));
    lm.insert("guo-ren", Unigram::new("國人", -6.3));
    lm.insert("ren-min", Unigram::new("人民", -5.1));
    lm.insert("zhong-guo-ren", Unigram::new("中國人", -7.0));
    lm.insert("guo-ren-min", Unigram::new("國人民", -8.9));
    lm
}
