//! Command-line flags understood by the engine tools.

/// Import a graph definition.
pub const GRAPHDEF_TO_MLIR: &str = "--graphdef-to-mlir";
/// Import a saved model's object graph.
pub const SAVEDMODEL_OBJECTGRAPH: &str = "--savedmodel-objectgraph-to-mlir";
/// Import a legacy saved model's signature defs.
pub const SAVEDMODEL_SIGNATUREDEFS: &str = "--savedmodel-signaturedefs-to-mlir";
/// Import a legacy saved model's signature defs, lite variant.
pub const SAVEDMODEL_SIGNATUREDEFS_LITE: &str = "--savedmodel-signaturedefs-to-mlir-lite";
/// Import a flat-buffer model.
pub const TFLITE_FLATBUFFER_TO_MLIR: &str = "--tflite-flatbuffer-to-mlir";

/// `,`-joined input node names.
pub const INPUT_ARRAYS: &str = "--tf-input-arrays";
/// `,`-joined input data types.
pub const INPUT_DATA_TYPES: &str = "--tf-input-data-types";
/// `:`-joined input shapes.
pub const INPUT_SHAPES: &str = "--tf-input-shapes";
/// `,`-joined output node names.
pub const OUTPUT_ARRAYS: &str = "--tf-output-arrays";

/// Exported-name filter.
pub const EXPORTED_NAMES: &str = "--tf-savedmodel-exported-names";
/// Meta-graph tag filter.
pub const SAVEDMODEL_TAGS: &str = "--tf-savedmodel-tags";
/// Upgrade legacy graph constructs.
pub const UPGRADE_LEGACY: &str = "--tf-upgrade-legacy";
/// Lift variables into function arguments.
pub const LIFT_VARIABLES: &str = "--tf-lift-variables";
/// Keep variables in the session initializer.
pub const INCLUDE_VARIABLES_IN_INITIALIZERS: &str = "--tf-include-variables-in-initializers";

/// Flat-buffer input array names.
pub const TFLITE_INPUT_ARRAYS: &str = "--input-arrays";
/// Flat-buffer output array names.
pub const TFLITE_OUTPUT_ARRAYS: &str = "--output-arrays";

/// Pass pipeline description.
pub const PASS_PIPELINE: &str = "--pass-pipeline";
/// Lower a flat-buffer import to TOSA.
pub const TFL_TO_TOSA_PIPELINE: &str = "--tfl-to-tosa-pipeline";
/// Store large constants outside the bytecode.
pub const TOSA_EXTERNAL_CONSTANT: &str = "--tosa-use-external-constant";
/// Emit bytecode instead of text.
pub const EMIT_BYTECODE: &str = "--emit-bytecode";
/// Print location info.
pub const PRINT_DEBUGINFO: &str = "--mlir-print-debuginfo";
/// Output file.
pub const OUTPUT: &str = "-o";
