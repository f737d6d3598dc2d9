use proptest::prelude::*;

use shotframe_editor_model::{
    reduce, Action, AnnotationRecorder, EditorState, Point, Tool,
};

fn record_gesture(state: &EditorState, start: Point, moves: &[Point]) -> EditorState {
    let mut recorder = AnnotationRecorder::new();
    let mut state = state.clone();
    assert!(recorder.begin_stroke(state.current_tool, start));
    for point in moves {
        let stroke = recorder
            .extend_stroke(&state, *point)
            .expect("recorder should be drawing");
        state = reduce(&state, Action::AppendStroke(stroke));
    }
    recorder.end_stroke();
    state
}

fn point_strategy() -> impl Strategy<Value = Point> {
    (0.0f64..2000.0, 0.0f64..2000.0).prop_map(|(x, y)| Point::new(x, y))
}

proptest! {
    #[test]
    fn n_moves_yield_n_two_point_strokes(
        start in point_strategy(),
        moves in prop::collection::vec(point_strategy(), 0..64),
    ) {
        let state = EditorState { current_tool: Tool::Pen, ..EditorState::default() };
        let state = record_gesture(&state, start, &moves);

        prop_assert_eq!(state.annotations.len(), moves.len());
        let mut previous = start;
        for (stroke, point) in state.annotations.iter().zip(&moves) {
            prop_assert_eq!(stroke.path.len(), 2);
            prop_assert_eq!(stroke.path[0], previous);
            prop_assert_eq!(stroke.path[1], *point);
            previous = *point;
        }
    }

    #[test]
    fn n_undos_empty_the_list_and_one_more_is_noop(
        start in point_strategy(),
        moves in prop::collection::vec(point_strategy(), 1..32),
    ) {
        let state = EditorState { current_tool: Tool::Highlighter, ..EditorState::default() };
        let mut state = record_gesture(&state, start, &moves);

        for remaining in (0..moves.len()).rev() {
            state = reduce(&state, Action::UndoStroke);
            prop_assert_eq!(state.annotations.len(), remaining);
        }
        prop_assert!(state.annotations.is_empty());

        let after_extra_undo = reduce(&state, Action::UndoStroke);
        prop_assert_eq!(after_extra_undo, state);
    }

    #[test]
    fn rotation_always_lands_in_range(degrees in -10_000.0f32..10_000.0) {
        let state = reduce(&EditorState::default(), Action::SetRotate(degrees));
        prop_assert!(state.rotate >= 0.0 && state.rotate < 360.0);
    }
}

#[test]
fn second_gesture_appends_after_first() {
    let state = EditorState {
        current_tool: Tool::Pen,
        ..EditorState::default()
    };
    let state = record_gesture(
        &state,
        Point::new(0.0, 0.0),
        &[Point::new(1.0, 0.0), Point::new(2.0, 0.0)],
    );
    let state = record_gesture(&state, Point::new(50.0, 50.0), &[Point::new(60.0, 60.0)]);

    assert_eq!(state.annotations.len(), 3);
    assert_eq!(state.annotations[2].path[0], Point::new(50.0, 50.0));

    // Undo removes the last move of the latest gesture, not the gesture.
    let state = reduce(&state, Action::UndoStroke);
    assert_eq!(state.annotations.len(), 2);
    assert_eq!(state.annotations[1].path[1], Point::new(2.0, 0.0));
}
