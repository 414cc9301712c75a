use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Analysis result has no document field map at analyzeResult.documents[0].fields")]
    MissingFieldMap,
}
