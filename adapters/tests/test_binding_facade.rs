//! What crosses the engine boundary for each facade operation.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use context::{ExecutionContext, RuntimeHandle};
use encoding::{encode, EncodedText};
use engine::{EngineCall, EngineError, GraphArrays, RecordingEngine};
use facade::{
    BindingError, BindingFacade, FunctionObject, GraphImportOptions, SavedModelV1Options,
    TextFunction, TosaOptions,
};

fn text(s: &str) -> EncodedText { encode("test", s).expect("valid text") }

fn strings(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|s| s.to_string()).collect())
}

/// Facade over a fresh recorder, with a private execution context.
fn recording_facade() -> (BindingFacade, Arc<RecordingEngine>) {
    let recorder = Arc::new(RecordingEngine::replying("module {}"));
    let ctx = Arc::new(ExecutionContext::with_initializer(|| RuntimeHandle::from_raw(77)));
    (BindingFacade::with_context_provider(recorder.clone(), ctx), recorder)
}

#[test]
fn import_graphdef_without_lists_uses_short_form() {
    let (facade, recorder) = recording_facade();

    let out = facade
        .import_graphdef("node { name: \"x\" }", Some("".into()), false, &GraphImportOptions::default())
        .expect("recorder replies");

    assert_eq!(out.as_bytes(), b"module {}");
    let call = recorder.last_call().expect("one call");
    assert_eq!(call.arity(), 3);
    assert_eq!(
        call,
        EngineCall::ImportGraphDef {
            graphdef: text("node { name: \"x\" }"),
            pass_pipeline: Some(text("")),
            show_debug_info: false,
            arrays: None,
        }
    );
}

#[test]
fn import_graphdef_with_input_names_uses_long_form() {
    let (facade, recorder) = recording_facade();
    let options = GraphImportOptions {
        input_names: strings(&["a", "b", "c"]),
        input_data_types: strings(&["DT_FLOAT", "DT_FLOAT", "DT_INT32"]),
        input_data_shapes: strings(&["1x2", "3x4", ""]),
        output_names: None,
    };

    facade
        .import_graphdef("node {}", Some("tf-standard-pipeline".into()), true, &options)
        .expect("recorder replies");

    let call = recorder.last_call().expect("one call");
    assert_eq!(call.arity(), 7);
    match call {
        EngineCall::ImportGraphDef { arrays: Some(arrays), show_debug_info, .. } => {
            assert!(show_debug_info);
            assert_eq!(
                arrays,
                GraphArrays {
                    input_names: text("a,b,c"),
                    input_data_types: text("DT_FLOAT,DT_FLOAT,DT_INT32"),
                    input_data_shapes: text("1x2:3x4:"),
                    output_names: text(""),
                }
            );
        }
        other => panic!("expected long-form graph import, got {:?}", other),
    }
}

#[test]
fn import_graphdef_without_input_names_ignores_other_lists() {
    let (facade, recorder) = recording_facade();
    let options = GraphImportOptions {
        input_names: None,
        input_data_types: strings(&["DT_FLOAT"]),
        input_data_shapes: None,
        output_names: strings(&["logits"]),
    };

    facade.import_graphdef("node {}", None, false, &options).expect("recorder replies");

    assert_eq!(recorder.last_call().map(|c| c.arity()), Some(3));
    match recorder.last_call() {
        Some(EngineCall::ImportGraphDef { arrays, .. }) => assert_eq!(arrays, None),
        other => panic!("expected graph import, got {:?}", other),
    }
}

#[test]
fn text_arguments_may_borrow_from_different_scopes() {
    let (facade, recorder) = recording_facade();
    let mlir = String::from("module {}");
    let destination = PathBuf::from("/tmp/out.mlirbc");

    facade.write_bytecode(&destination, &mlir).expect("ok");
    let pipeline = format!("builtin.module({})", "canonicalize");
    facade.run_pass_pipeline(mlir.as_bytes(), pipeline.as_str(), false).expect("ok");

    assert_eq!(recorder.calls().len(), 2);
}

#[test]
fn absent_optional_text_is_not_empty_text() {
    let (facade, recorder) = recording_facade();

    facade.convert_saved_model_v1_lite("/models/v1", None, None, true, false).expect("ok");
    facade
        .convert_saved_model_v1_lite("/models/v1", Some("".into()), Some("".into()), true, false)
        .expect("ok");

    let calls = recorder.calls();
    assert_eq!(calls.len(), 2);
    match (&calls[0], &calls[1]) {
        (
            EngineCall::ConvertSavedModelV1Lite { exported_names: a_names, tags: a_tags, .. },
            EngineCall::ConvertSavedModelV1Lite { exported_names: b_names, tags: b_tags, .. },
        ) => {
            assert_eq!(a_names, &None);
            assert_eq!(a_tags, &None);
            assert_eq!(b_names, &Some(text("")));
            assert_eq!(b_tags, &Some(text("")));
        }
        other => panic!("unexpected calls {:?}", other),
    }
}

#[test]
fn import_function_initializes_context_before_serializing() {
    struct Probe<'a> {
        ctx: &'a ExecutionContext,
        serialized: AtomicUsize,
    }

    impl FunctionObject for Probe<'_> {
        fn function_def(&self) -> String {
            assert!(self.ctx.is_initialized(), "context must be up before serialization");
            self.serialized.fetch_add(1, Ordering::SeqCst);
            "signature { name: \"f\" }".to_string()
        }
    }

    let recorder = Arc::new(RecordingEngine::new());
    let ctx = Arc::new(ExecutionContext::with_initializer(|| RuntimeHandle::from_raw(5)));
    let facade = BindingFacade::with_context_provider(recorder.clone(), ctx.clone());
    let probe = Probe { ctx: &ctx, serialized: AtomicUsize::new(0) };

    facade.import_function(&probe, None, false).expect("ok");
    facade.import_function(&probe, None, false).expect("ok");

    assert_eq!(probe.serialized.load(Ordering::SeqCst), 2);
    for call in recorder.calls() {
        match call {
            EngineCall::ImportFunction { handle, function_def, pass_pipeline, .. } => {
                assert_eq!(handle, RuntimeHandle::from_raw(5));
                assert_eq!(function_def, text("signature { name: \"f\" }"));
                assert_eq!(pass_pipeline, None);
            }
            other => panic!("expected ImportFunction, got {:?}", other),
        }
    }
}

#[test]
fn saved_model_v1_forwards_every_flag_in_order() {
    let (facade, recorder) = recording_facade();
    let options = SavedModelV1Options {
        lift_variables: false,
        include_variables_in_initializers: true,
        upgrade_legacy: false,
    };

    facade
        .convert_saved_model_v1("/m", Some("serving_default".into()), Some("serve".into()), &options, true)
        .expect("ok");

    assert_eq!(
        recorder.last_call(),
        Some(EngineCall::ConvertSavedModelV1 {
            saved_model_path: text("/m"),
            exported_names: Some(text("serving_default")),
            tags: Some(text("serve")),
            lift_variables: false,
            include_variables_in_initializers: true,
            upgrade_legacy: false,
            show_debug_info: true,
        })
    );
}

#[test]
fn convert_saved_model_accepts_paths() {
    let (facade, recorder) = recording_facade();
    let path = PathBuf::from("/models/object_graph");

    facade.convert_saved_model(&path, Some("f,g".into()), false).expect("ok");

    assert_eq!(
        recorder.last_call(),
        Some(EngineCall::ConvertSavedModel {
            saved_model_path: text("/models/object_graph"),
            exported_names: Some(text("f,g")),
            show_debug_info: false,
        })
    );
}

#[test]
fn tosa_conversion_forwards_empty_lists_when_absent() {
    let (facade, recorder) = recording_facade();

    facade
        .tflite_to_tosa_bytecode("model.tflite", "model.mlirbc", &TosaOptions::default())
        .expect("ok");

    assert_eq!(
        recorder.last_call(),
        Some(EngineCall::TfliteToTosaBytecode {
            flatbuffer: text("model.tflite"),
            bytecode: text("model.mlirbc"),
            use_external_constant: false,
            ordered_input_arrays: vec![],
            ordered_output_arrays: vec![],
        })
    );
}

#[test]
fn tosa_conversion_forwards_lists_unjoined() {
    let (facade, recorder) = recording_facade();
    let options = TosaOptions {
        use_external_constant: true,
        ordered_input_arrays: strings(&["serving_default_x:0", "serving_default_y:0"]),
        ordered_output_arrays: strings(&["StatefulPartitionedCall:0"]),
    };

    facade.tflite_to_tosa_bytecode("m.tflite", "m.mlirbc", &options).expect("ok");

    match recorder.last_call() {
        Some(EngineCall::TfliteToTosaBytecode {
            use_external_constant,
            ordered_input_arrays,
            ordered_output_arrays,
            ..
        }) => {
            assert!(use_external_constant);
            assert_eq!(ordered_input_arrays, vec!["serving_default_x:0", "serving_default_y:0"]);
            assert_eq!(ordered_output_arrays, vec!["StatefulPartitionedCall:0"]);
        }
        other => panic!("expected TFLite conversion, got {:?}", other),
    }
}

#[test]
fn write_bytecode_and_run_pass_pipeline_forward_text() {
    let (facade, recorder) = recording_facade();

    facade.write_bytecode("/tmp/out.mlirbc", "module {}").expect("ok");
    facade.run_pass_pipeline("module {}", "builtin.module(canonicalize)", true).expect("ok");

    assert_eq!(
        recorder.calls(),
        vec![
            EngineCall::WriteBytecode { filename: text("/tmp/out.mlirbc"), mlir_txt: text("module {}") },
            EngineCall::RunPassPipeline {
                mlir_txt: text("module {}"),
                pass_pipeline: text("builtin.module(canonicalize)"),
                show_debug_info: true,
            },
        ]
    );
}

#[test]
fn encoding_failure_happens_before_the_engine_call() {
    let (facade, recorder) = recording_facade();
    let bad = vec![b'm', b'o', b'd', 0xc3, 0x28];

    let err = facade.run_pass_pipeline(&bad, "canonicalize", false).expect_err("invalid utf-8");

    match err {
        BindingError::Encoding(e) => {
            assert_eq!(e.param, "mlir_txt");
            assert_eq!(e.valid_up_to, 3);
        }
        other => panic!("expected encoding error, got {:?}", other),
    }
    assert!(recorder.calls().is_empty(), "engine must not be called");
}

#[test]
fn malformed_pipeline_surfaces_engine_error_unchanged() {
    let recorder = Arc::new(RecordingEngine::rejecting(
        "<unknown>:0: error: 'builtin.module(canonicalize' expected ')'",
    ));
    let facade = BindingFacade::new(recorder.clone());

    let err = facade
        .run_pass_pipeline("module {}", "builtin.module(canonicalize", false)
        .expect_err("engine rejects");

    assert_eq!(err.to_string(), "<unknown>:0: error: 'builtin.module(canonicalize' expected ')'");
    assert!(matches!(err.engine_error(), Some(EngineError::Rejected(_))));
    assert_eq!(recorder.calls().len(), 1);
}

#[test]
fn text_function_round_trips_its_definition() {
    let (facade, recorder) = recording_facade();
    let function = TextFunction::new("signature { name: \"g\" }");

    facade.import_function(&function, Some("tf-standard-pipeline".into()), true).expect("ok");

    match recorder.last_call() {
        Some(EngineCall::ImportFunction { function_def, pass_pipeline, show_debug_info, handle }) => {
            assert_eq!(function_def.as_bytes(), b"signature { name: \"g\" }");
            assert_eq!(pass_pipeline, Some(text("tf-standard-pipeline")));
            assert!(show_debug_info);
            assert_eq!(handle, RuntimeHandle::from_raw(77));
        }
        other => panic!("expected ImportFunction, got {:?}", other),
    }
}
