//! Failure fallback behaviour of the row quantizer and dequantizer.

mod common;

use common::{weights, ScriptedStrategy, DECODE_POISON, ENCODE_POISON};
use lowbit::{
    blocks_for, dequantize_row, quantize_row, BlockQuaternary, BlockTernary, Error, FallbackPolicy,
    QuantBlock, RowConfig,
};

fn configs() -> [RowConfig; 2] {
    [
        RowConfig::new().sequential(),
        RowConfig::new().with_parallel_threshold(1),
    ]
}

#[test]
fn test_encode_failure_zeroes_only_that_block() {
    for config in configs() {
        let strategy = ScriptedStrategy::new();
        let mut row = weights(32 * 5, 1);
        row[2 * 32 + 7] = ENCODE_POISON;

        let mut clean = vec![BlockTernary::default(); 5];
        let mut reference = weights(32 * 5, 1);
        reference[2 * 32 + 7] = 0.0;
        quantize_row(&strategy, &reference, &mut clean, &config).unwrap();

        let mut blocks = vec![BlockTernary::default(); 5];
        let stats = quantize_row(&strategy, &row, &mut blocks, &config).unwrap();

        assert_eq!(stats.failed_blocks, vec![2]);
        assert!(blocks[2].is_zeroed());
        for i in [0, 1, 3, 4] {
            assert_eq!(blocks[i], clean[i], "block {i} changed");
        }
    }
}

#[test]
fn test_encode_failure_in_padded_tail() {
    let strategy = ScriptedStrategy::new();
    let mut row = weights(64 + 10, 2);
    row[64 + 3] = ENCODE_POISON;

    let mut blocks = vec![BlockQuaternary::default(); 2];
    let stats = quantize_row(&strategy, &row, &mut blocks, &RowConfig::default()).unwrap();

    assert!(stats.padded_tail);
    assert_eq!(stats.failed_blocks, vec![1]);
    assert_eq!(blocks[1].scale, 0.0);
    assert_eq!(blocks[1].zero_point, 0.0);
    assert!(blocks[1].qs.iter().all(|&b| b == 0));
    assert!(!blocks[0].is_zeroed());
}

#[test]
fn test_decode_failure_zeroes_only_that_range() {
    for config in configs() {
        let strategy = ScriptedStrategy::new();
        let row = weights(32 * 4, 3);
        let mut blocks = vec![BlockTernary::default(); 4];
        quantize_row(&strategy, &row, &mut blocks, &config).unwrap();

        let mut expected = vec![0.0f32; row.len()];
        dequantize_row(&strategy, &blocks, &mut expected, &config).unwrap();

        blocks[1].zero_point = DECODE_POISON;
        let mut restored = vec![f32::NAN; row.len()];
        let stats = dequantize_row(&strategy, &blocks, &mut restored, &config).unwrap();

        assert_eq!(stats.failed_blocks, vec![1]);
        assert!(restored[32..64].iter().all(|&v| v == 0.0));
        assert_eq!(&restored[..32], &expected[..32]);
        assert_eq!(&restored[64..], &expected[64..]);
    }
}

#[test]
fn test_decode_failure_in_tail_writes_only_remainder() {
    let strategy = ScriptedStrategy::new();
    let row = weights(32 + 8, 4);
    let mut blocks = vec![BlockTernary::default(); 2];
    quantize_row(&strategy, &row, &mut blocks, &RowConfig::default()).unwrap();
    blocks[1].zero_point = DECODE_POISON;

    // Row is the first 40 values of a larger buffer; the rest must survive.
    let mut buffer = vec![7.0f32; 64];
    let stats = dequantize_row(&strategy, &blocks, &mut buffer[..40], &RowConfig::default()).unwrap();

    assert_eq!(stats.failed_blocks, vec![1]);
    assert!(buffer[32..40].iter().all(|&v| v == 0.0));
    assert!(buffer[40..].iter().all(|&v| v == 7.0));
    assert!(buffer[..32].iter().all(|v| v.is_finite()));
}

#[test]
fn test_one_strategy_call_per_block() {
    let strategy = ScriptedStrategy::new();
    let mut row = weights(64 * 3 + 5, 5);
    row[0] = ENCODE_POISON;

    let count = blocks_for::<BlockQuaternary>(row.len());
    let mut blocks = vec![BlockQuaternary::default(); count];
    quantize_row(&strategy, &row, &mut blocks, &RowConfig::default()).unwrap();
    assert_eq!(strategy.encode_calls(), count);

    let mut restored = vec![0.0f32; row.len()];
    dequantize_row(&strategy, &blocks, &mut restored, &RowConfig::default()).unwrap();
    assert_eq!(strategy.decode_calls(), count);
}

#[test]
fn test_propagate_reports_every_failed_block() {
    let config = RowConfig::new()
        .with_fallback(FallbackPolicy::Propagate)
        .with_fallback_warnings(false);
    let strategy = ScriptedStrategy::new();

    let mut row = weights(32 * 6 + 1, 6);
    row[5] = ENCODE_POISON;
    row[4 * 32] = ENCODE_POISON;
    row[6 * 32] = ENCODE_POISON;

    let mut blocks = vec![BlockTernary::default(); 7];
    match quantize_row(&strategy, &row, &mut blocks, &config) {
        Err(Error::BlocksFailed { failed, total, .. }) => {
            assert_eq!(failed, vec![0, 4, 6]);
            assert_eq!(total, 7);
        }
        other => panic!("expected BlocksFailed, got {other:?}"),
    }

    // The row was still completed.
    assert_eq!(strategy.encode_calls(), 7);
    assert!(blocks[0].is_zeroed() && blocks[4].is_zeroed() && blocks[6].is_zeroed());
    assert!(!blocks[1].is_zeroed());
}

#[test]
fn test_propagate_on_decode_reports_and_zeroes() {
    for config in configs() {
        let config = config
            .with_fallback(FallbackPolicy::Propagate)
            .with_fallback_warnings(false);
        let strategy = ScriptedStrategy::new();
        let row = weights(32 * 5 + 9, 8);
        let mut blocks = vec![BlockTernary::default(); 6];
        quantize_row(&strategy, &row, &mut blocks, &config).unwrap();

        blocks[1].zero_point = DECODE_POISON;
        blocks[5].zero_point = DECODE_POISON;
        let mut restored = vec![f32::NAN; row.len()];
        match dequantize_row(&strategy, &blocks, &mut restored, &config) {
            Err(Error::BlocksFailed { failed, total, .. }) => {
                assert_eq!(failed, vec![1, 5]);
                assert_eq!(total, 6);
            }
            other => panic!("expected BlocksFailed, got {other:?}"),
        }

        assert!(restored[32..64].iter().all(|&v| v == 0.0));
        assert!(restored[160..].iter().all(|&v| v == 0.0));
        assert!(restored[..32].iter().chain(&restored[64..160]).all(|v| v.is_finite()));
    }
}
