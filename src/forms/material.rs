use serde::Serialize;

use crate::{
    domain::{Constraint, FieldKind, FieldSchema, FormSchema},
    form::{FieldCoercionError, FileUpload, FormState},
};

use super::{CourseForm, file, required_text, text};

pub const MATERIAL_FORMATS: [&str; 6] = [
    "application/pdf",
    "application/zip",
    "application/x-rar-compressed",
    "application/octet-stream",
    "application/x-zip-compressed",
    "multipart/x-zip",
];

const INVALID_MATERIAL: &str = "Material inválido!";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PartBody {
    Text(String),
    File(FilePart),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl From<FileUpload> for FilePart {
    fn from(upload: FileUpload) -> Self {
        Self {
            size: upload.bytes.len(),
            file_name: upload.file_name,
            content_type: upload.content_type,
            bytes: upload.bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormPart {
    pub name: String,
    pub body: PartBody,
}

/// Ordered multipart body, appended part by part.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts.push(FormPart {
            name: name.into(),
            body: PartBody::Text(value.into()),
        });
    }

    pub fn append_file(&mut self, name: impl Into<String>, upload: FileUpload) {
        self.parts.push(FormPart {
            name: name.into(),
            body: PartBody::File(upload.into()),
        });
    }

    pub fn part(&self, name: &str) -> Option<&PartBody> {
        self.parts
            .iter()
            .find(|part| part.name == name)
            .map(|part| &part.body)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.part(name)? {
            PartBody::Text(text) => Some(text),
            PartBody::File(_) => None,
        }
    }
}

/// Upload of a course material file.
#[derive(Debug, Clone, Default)]
pub struct MaterialForm;

impl CourseForm for MaterialForm {
    type Payload = MultipartForm;

    fn schema(&self) -> FormSchema {
        let accept: Vec<String> = MATERIAL_FORMATS.iter().map(|mime| mime.to_string()).collect();
        FormSchema::new("material", "Material")
            .with_field(
                FieldSchema::new(
                    "material",
                    "Material",
                    FieldKind::File {
                        accept: accept.clone(),
                    },
                )
                .with_constraint(Constraint::Required {
                    message: INVALID_MATERIAL.to_string(),
                })
                .with_constraint(Constraint::AllowedMime {
                    accept,
                    message: INVALID_MATERIAL.to_string(),
                }),
            )
            .with_field(FieldSchema::new("title", "Nome", FieldKind::String).required())
            .with_field(FieldSchema::new("description", "Descrição", FieldKind::String))
    }

    fn build_payload(&self, state: &FormState) -> Result<MultipartForm, FieldCoercionError> {
        let mut form = MultipartForm::new();
        form.append_text("title", required_text(state, "title")?);
        form.append_text("description", text(state, "description")?);
        form.append_file("material", file(state, "material")?);
        Ok(form)
    }

    fn success_text(&self) -> &str {
        "Material criado com sucesso!"
    }

    fn error_text(&self) -> &str {
        "Erro ao adicionar o material!"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldInput;

    #[test]
    fn multipart_keeps_append_order() {
        let mut state = FormState::from_schema(&MaterialForm.schema());
        state.set_value("title", FieldInput::text("Aula 1")).unwrap();
        state
            .set_value(
                "material",
                FieldInput::File(FileUpload::new("aula.pdf", "application/pdf", b"%PDF".to_vec())),
            )
            .unwrap();
        let payload = MaterialForm.build_payload(&state).unwrap();
        let names: Vec<&str> = payload.parts.iter().map(|part| part.name.as_str()).collect();
        assert_eq!(names, ["title", "description", "material"]);
        assert_eq!(payload.text("description"), Some(""));
        match payload.part("material") {
            Some(PartBody::File(file)) => {
                assert_eq!(file.size, 4);
                assert_eq!(file.bytes, b"%PDF");
            }
            other => panic!("unexpected part {other:?}"),
        }
    }

    #[test]
    fn missing_file_blocks_submission() {
        let mut state = FormState::from_schema(&MaterialForm.schema());
        state.set_value("title", FieldInput::text("Aula 1")).unwrap();
        assert!(!state.is_valid());
        state.touch("material");
        assert_eq!(state.displayed_error("material"), Some(INVALID_MATERIAL));
    }
}
