use error_set::error_set;

error_set!{
    PredictError = PreprocessError || InferenceError;
    PreprocessError = ValidationError || EdgeListError;
    ValidationError = {
        #[display("Missing edgelist")]
        MissingEdgelist,
        #[display("Empty edgelist: the graph has no nodes")]
        EmptyGraph,
        #[display("Invalid JSON body: {reason}")]
        InvalidBody{reason: String},
        #[display("Too many nodes: the graph has {nodes}, the limit is {limit}")]
        TooManyNodes{nodes: usize, limit: usize},
        #[display("Request body too large: {reason}")]
        BodyTooLarge{reason: String},
        #[display("Feature width {width} is smaller than the {natural} structural features")]
        FeatureWidth{width: usize, natural: usize},
    };
    EdgeListError = {
        #[display("Malformed edgelist: {reason}")]
        MalformedInput{reason: String},
    };
    InferenceError = {
        #[display("Empty edgelist: the graph has no nodes")]
        EmptyGraph,
        #[display("Shape mismatch: {reason}")]
        ShapeMismatch{reason: String},
        #[display("Inference worker failed: {reason}")]
        WorkerFailed{reason: String},
    };
    ModelLoadError = {
        #[display("Weight file not found: {path}")]
        WeightsNotFound{path: String},
        #[display("Could not read weight file {path}: {reason}")]
        WeightsUnreadable{path: String, reason: String},
        #[display("Weight mismatch for {tensor}: expected {expected}, found {found}")]
        WeightMismatch{tensor: String, expected: String, found: String},
        #[display("Warm-up forward pass failed: {reason}")]
        WarmupFailed{reason: String},
    };
}
