use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::PaginationConfig;

use super::domain::{Application, ApplicationId, ApplicationStatus, ApplicationType, EmployeeId};
use super::repository::{ApplicationFilter, ApplicationRepository, DateWindow, RepositoryError};

const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Listing request for one employee and one application type.
///
/// `page` and `size` at or below zero fall back to the configured defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub employee_id: EmployeeId,
    pub application_type: ApplicationType,
    pub page: i64,
    pub size: i64,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl ListingQuery {
    pub fn new(employee_id: EmployeeId, application_type: ApplicationType) -> Self {
        Self {
            employee_id,
            application_type,
            page: 0,
            size: 0,
            from: None,
            to: None,
        }
    }

    fn paging(&self, defaults: PaginationConfig) -> (u32, u32) {
        let resolve = |value: i64, fallback: u32| {
            if value <= 0 {
                fallback
            } else {
                u32::try_from(value).unwrap_or(u32::MAX)
            }
        };
        (
            resolve(self.page, defaults.default_page),
            resolve(self.size, defaults.page_size),
        )
    }

    fn filter(&self) -> ApplicationFilter {
        ApplicationFilter::default()
            .employee(self.employee_id)
            .of_type(self.application_type)
            .within(DateWindow::from_bounds(self.from, self.to))
    }
}

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_records: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Offset pagination over an already ordered sequence. `page` is 1-based.
    pub fn paginate(items: Vec<T>, page: u32, size: u32) -> Self {
        let page = page.max(1);
        let size = size.max(1);
        let total_records = items.len() as u64;
        let total_pages = total_records.div_ceil(u64::from(size));
        let skip = (page as usize - 1).saturating_mul(size as usize);

        let items = items.into_iter().skip(skip).take(size as usize).collect();

        Self {
            items,
            page_number: page,
            page_size: size,
            total_records,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_records: self.total_records,
            total_pages: self.total_pages,
        }
    }
}

/// Display projection of a stored application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationView {
    pub id: ApplicationId,
    pub title: String,
    pub reason: String,
    #[serde(rename = "type")]
    pub application_type: ApplicationType,
    pub started_date: String,
    pub ended_date: String,
    pub status: ApplicationStatus,
    pub created_date: String,
}

impl From<Application> for ApplicationView {
    fn from(record: Application) -> Self {
        Self {
            id: record.id,
            title: record.name,
            reason: record.note,
            application_type: record.application_type,
            started_date: record.start_date.format(DISPLAY_FORMAT).to_string(),
            ended_date: record.end_date.format(DISPLAY_FORMAT).to_string(),
            status: record.status,
            created_date: record.created_date.format(DISPLAY_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationListView {
    pub application_list: Vec<ApplicationView>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_records: u64,
    pub total_pages: u64,
}

impl From<Page<ApplicationView>> for ApplicationListView {
    fn from(page: Page<ApplicationView>) -> Self {
        Self {
            application_list: page.items,
            page_number: page.page_number,
            page_size: page.page_size,
            total_records: page.total_records,
            total_pages: page.total_pages,
        }
    }
}

/// Filter, order newest-first by id, paginate and project.
pub(crate) fn list_applications<R>(
    repository: &R,
    query: &ListingQuery,
    defaults: PaginationConfig,
) -> Result<ApplicationListView, RepositoryError>
where
    R: ApplicationRepository + ?Sized,
{
    let (page, size) = query.paging(defaults);

    let filter = query.filter();
    let mut records: Vec<Application> = repository
        .find_all()?
        .into_iter()
        .filter(|record| filter.matches(record))
        .collect();
    records.sort_by(|left, right| right.id.cmp(&left.id));

    let page = Page::paginate(records, page, size).map(ApplicationView::from);
    Ok(page.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn paginate_reports_totals_before_slicing() {
        let page = Page::paginate((1..=23).collect::<Vec<_>>(), 3, 10);
        assert_eq!(page.items, vec![21, 22, 23]);
        assert_eq!(page.total_records, 23);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let page = Page::paginate(vec!['a', 'b'], 4, 2);
        assert!(page.items.is_empty());
        assert_eq!(page.page_number, 4);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn paginate_empty_has_no_pages() {
        let page = Page::<u8>::paginate(Vec::new(), 1, 10);
        assert_eq!(page.total_records, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn non_positive_paging_uses_defaults() {
        let mut query = ListingQuery::new(EmployeeId(1), ApplicationType::Leave);
        let defaults = PaginationConfig {
            default_page: 1,
            page_size: 15,
        };
        assert_eq!(query.paging(defaults), (1, 15));

        query.page = -3;
        query.size = 4;
        assert_eq!(query.paging(defaults), (1, 4));
    }

    #[test]
    fn view_formats_dates_for_display() {
        let at = |day, hour, minute| {
            NaiveDate::from_ymd_opt(2024, 5, day)
                .and_then(|date| date.and_hms_opt(hour, minute, 0))
                .expect("valid")
        };
        let view = ApplicationView::from(Application {
            id: ApplicationId(3),
            employee_id: EmployeeId(9),
            application_type: ApplicationType::GoingOut,
            status: ApplicationStatus::Requested,
            name: "Bank errand".to_string(),
            note: "Paperwork".to_string(),
            start_date: at(2, 14, 5),
            end_date: at(2, 15, 30),
            created_date: at(1, 8, 0),
        });

        assert_eq!(view.title, "Bank errand");
        assert_eq!(view.reason, "Paperwork");
        assert_eq!(view.started_date, "02/05/2024 14:05");
        assert_eq!(view.ended_date, "02/05/2024 15:30");
        assert_eq!(view.created_date, "01/05/2024 08:00");
    }
}
