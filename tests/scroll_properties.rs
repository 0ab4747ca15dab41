//! Property-based tests for cursor and scroll invariants.
//!
//! Property Under Test:
//! "After any sequence of movements, scrolls and resizes, the cursor is a
//! valid line and stays inside the viewport, and the offset never scrolls
//! past the last page."

use proptest::prelude::*;
use tigview::view_state::scroll::{max_offset, percentage};
use tigview::view_state::{Movement, ScrollState};

// ===== Arbitrary Strategies =====

#[derive(Debug, Clone, Copy)]
enum Op {
    Move(Movement),
    Scroll(isize),
    Resize(usize),
}

fn arb_movement() -> impl Strategy<Value = Movement> {
    prop_oneof![
        Just(Movement::Up),
        Just(Movement::Down),
        Just(Movement::PageUp),
        Just(Movement::PageDown),
        Just(Movement::First),
        Just(Movement::Last),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => arb_movement().prop_map(Op::Move),
        2 => (-30isize..=30).prop_map(Op::Scroll),
        1 => (0usize..=40).prop_map(Op::Resize),
    ]
}

fn apply(state: &mut ScrollState, op: Op, total: usize) {
    match op {
        Op::Move(movement) => state.move_cursor(movement, total),
        Op::Scroll(delta) => state.scroll_lines(delta, total),
        Op::Resize(height) => state.resize(state.width(), height, total),
    }
}

fn assert_invariants(state: &ScrollState, total: usize) -> Result<(), TestCaseError> {
    prop_assert!(state.offset() <= max_offset(total, state.height()));
    if total == 0 {
        prop_assert_eq!(state.cursor(), 0);
        prop_assert_eq!(state.offset(), 0);
    } else {
        prop_assert!(state.cursor() < total);
        if state.height() > 0 {
            prop_assert!(state.offset() <= state.cursor());
            prop_assert!(state.cursor() < state.offset() + state.height());
        }
    }
    Ok(())
}

// ===== Properties =====

proptest! {
    #[test]
    fn invariants_hold_after_any_operation_sequence(
        total in 0usize..200,
        height in 0usize..40,
        ops in prop::collection::vec(arb_op(), 0..60),
    ) {
        let mut state = ScrollState::new(80, height);
        for op in ops {
            apply(&mut state, op, total);
            assert_invariants(&state, total)?;
        }
    }

    #[test]
    fn invariants_hold_while_lines_keep_arriving(
        height in 1usize..30,
        batches in prop::collection::vec((1usize..20, arb_op()), 1..40),
    ) {
        let mut state = ScrollState::new(80, height);
        let mut total = 0;
        for (added, op) in batches {
            total += added;
            apply(&mut state, op, total);
            assert_invariants(&state, total)?;
        }
    }

    #[test]
    fn first_then_last_reaches_both_ends(total in 1usize..500, height in 1usize..50) {
        let mut state = ScrollState::new(80, height);
        state.move_cursor(Movement::Last, total);
        prop_assert_eq!(state.cursor(), total - 1);
        prop_assert_eq!(state.offset(), max_offset(total, height));

        state.move_cursor(Movement::First, total);
        prop_assert_eq!(state.cursor(), 0);
        prop_assert_eq!(state.offset(), 0);
    }

    #[test]
    fn visible_range_never_exceeds_height(
        total in 0usize..300,
        height in 0usize..50,
        moves in prop::collection::vec(arb_movement(), 0..20),
    ) {
        let mut state = ScrollState::new(80, height);
        for movement in moves {
            state.move_cursor(movement, total);
        }
        let visible = state.visible(total);
        prop_assert!(visible.len() <= height);
        prop_assert!(visible.end <= total);
    }

    #[test]
    fn percentage_is_monotonic_and_bounded(total in 1usize..10_000, cursor in 0usize..10_000) {
        let cursor = cursor % total;
        let pct = percentage(cursor, total);
        prop_assert!(pct <= 100);
        prop_assert_eq!(percentage(total - 1, total), 100);
        if cursor + 1 < total {
            prop_assert!(percentage(cursor + 1, total) >= pct);
        }
    }
}

#[test]
fn zero_height_viewport_never_moves_offset() {
    let mut state = ScrollState::new(80, 0);
    for movement in [Movement::Down, Movement::PageDown, Movement::Last] {
        state.move_cursor(movement, 10);
        assert_eq!(state.offset(), 0);
    }
    assert!(state.visible(10).is_empty());
}
