/// A reference to an external 3D model of the component.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    filename: String,
}

impl Model {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }
}
