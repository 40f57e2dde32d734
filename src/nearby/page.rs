use crate::nearby::domain::query_response::PageGet;

const NO_DESCRIPTION: &str = "No further information";

#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub pageid: u64,
    pub title: String,
    pub description: String,
}

impl From<PageGet> for Page {
    fn from(page: PageGet) -> Self {
        let description = page
            .terms
            .and_then(|mut terms| terms.remove("description"))
            .and_then(|descriptions| descriptions.into_iter().next())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        Page {
            pageid: page.pageid,
            title: page.title,
            description,
        }
    }
}
