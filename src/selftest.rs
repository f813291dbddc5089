//! Built-in sample sentences with known transliterations.
//!
//! `bn2en --test` runs these without touching a PDF, which makes it the
//! quickest way to check an installation or a custom exception file.

use crate::translit::Transliterator;
use serde::Serialize;

/// `(bengali, expected)` pairs.
pub const SAMPLES: &[(&str, &str)] = &[
    ("পথের পাঁচালী", "pother pachali"),
    (
        "নিশ্চিন্দিপুর গ্রামের একেবারে উত্তরপ্রান্তে",
        "Nishchindipur gramer ekebare uttarprante",
    ),
    ("বাংলা ভাষা অত্যন্ত সুন্দর", "bangla bhasha otyonto sundor"),
    ("রবীন্দ্রনাথ ঠাকুর বিশ্বকবি", "Rabindranath Thakur bishwakobi"),
];

/// Outcome for one sample.
#[derive(Debug, Clone, Serialize)]
pub struct SelfTestCase {
    pub bengali: &'static str,
    pub expected: &'static str,
    pub actual: String,
    pub passed: bool,
}

/// Outcome for all samples.
#[derive(Debug, Clone, Serialize)]
pub struct SelfTestReport {
    pub cases: Vec<SelfTestCase>,
}

impl SelfTestReport {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed).count()
    }

    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(|c| c.passed)
    }
}

/// Transliterate every sample with `transliterator` and compare.
pub fn run_self_test(transliterator: &Transliterator) -> SelfTestReport {
    let cases = SAMPLES
        .iter()
        .map(|&(bengali, expected)| {
            let actual = transliterator.transliterate(bengali);
            let passed = actual == expected;
            SelfTestCase {
                bengali,
                expected,
                actual,
                passed,
            }
        })
        .collect();
    SelfTestReport { cases }
}
