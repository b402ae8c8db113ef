/// Content of the page shown for unknown routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFoundPage {
    pub status: u16,
    pub heading: &'static str,
    pub message: &'static str,
}

pub fn not_found() -> NotFoundPage {
    NotFoundPage {
        status: 404,
        heading: "Ooops!",
        message: "Página não encontrada!",
    }
}
