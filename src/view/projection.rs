use crate::app::controller::ViewController;
use crate::app::types::ViewPhase;
use crate::data::{BidNotice, ResultStore, SelectionSummary};
use crate::format::{BadgeStyle, badge_style, format_date, format_price};

pub const LINK_PRESENT: &str = "상세보기";
pub const LINK_MISSING: &str = "링크없음";

/// Column titles, in draw order
pub const COLUMNS: [&str; 8] = [
    "",
    "구분",
    "공고일시",
    "공고명",
    "수요기관",
    "마감일시",
    "추정가격",
    "링크",
];

/// One table row, fully formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: String,
    pub checked: bool,
    pub badge: BadgeStyle,
    pub category: String,
    pub announced: String,
    pub title: String,
    pub notice_no: String,
    pub agency: String,
    pub closes: String,
    pub price: String,
    pub link: &'static str,
}

impl RowView {
    pub fn new(notice: &BidNotice, checked: bool) -> Self {
        let has_link = notice
            .detail_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());

        Self {
            id: notice.id.clone(),
            checked,
            badge: badge_style(&notice.category),
            category: notice.category.label().to_string(),
            announced: format_date(notice.announced_at.as_deref()),
            title: notice.title.clone(),
            notice_no: notice.notice_no.clone(),
            agency: if notice.agency.trim().is_empty() {
                notice.announcing_agency.clone().unwrap_or_default()
            } else {
                notice.agency.clone()
            },
            closes: format_date(notice.closes_at.as_deref()),
            price: format_price(notice.estimated_price.as_deref()),
            link: if has_link { LINK_PRESENT } else { LINK_MISSING },
        }
    }
}

/// Everything the screen shows, derived from controller state.
///
/// Rebuilt after every change; the UI never reads the store directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub phase: ViewPhase,
    pub rows: Vec<RowView>,
    pub header: SelectionSummary,
    /// `"{n}건"`, absent until the first search resolves
    pub count_label: Option<String>,
    pub selected: usize,
    pub busy: Option<&'static str>,
}

impl Projection {
    pub fn from_controller(controller: &ViewController) -> Self {
        let store = controller.store();
        // After a failed search the kept rows stay off screen
        let (rows, header, selected) = if controller.results_visible() {
            (rows(store), store.summary(), store.selected_count())
        } else {
            (Vec::new(), SelectionSummary::None, 0)
        };

        Self {
            phase: controller.phase(),
            rows,
            header,
            count_label: controller.count_label().map(count_label),
            selected,
            busy: controller.busy_message(),
        }
    }

    /// Header checkbox glyph: indeterminate for a partial selection
    pub fn header_checkbox(&self) -> &'static str {
        checkbox(self.header)
    }
}

pub fn rows(store: &ResultStore) -> Vec<RowView> {
    store
        .rows()
        .iter()
        .map(|notice| RowView::new(notice, store.is_selected(&notice.id)))
        .collect()
}

pub fn count_label(count: usize) -> String {
    format!("{}건", count)
}

pub fn checkbox(summary: SelectionSummary) -> &'static str {
    match summary {
        SelectionSummary::None => "[ ]",
        SelectionSummary::Partial => "[-]",
        SelectionSummary::All => "[x]",
    }
}

pub fn row_checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BidCategory;

    fn notice(id: &str, url: Option<&str>) -> BidNotice {
        BidNotice {
            id: id.to_string(),
            category: BidCategory::Construction,
            announced_at: Some("2024-01-15 09:30:00".to_string()),
            closes_at: Some("bad".to_string()),
            title: "청사 보수공사".to_string(),
            notice_no: "20240115001".to_string(),
            agency: "서울특별시".to_string(),
            announcing_agency: None,
            estimated_price: Some("150000000".to_string()),
            detail_url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_row_formatting() {
        let row = RowView::new(&notice("1", Some("https://www.g2b.go.kr/1")), true);
        assert!(row.checked);
        assert_eq!(row.badge, BadgeStyle::Construction);
        assert_eq!(row.category, "건설공사");
        assert_eq!(row.announced, "01/15 09:30");
        assert_eq!(row.closes, "bad");
        assert_eq!(row.price, "1.5억원");
        assert_eq!(row.link, LINK_PRESENT);
    }

    #[test]
    fn test_agency_falls_back_to_announcing_agency() {
        let mut n = notice("1", None);
        n.agency = String::new();
        n.announcing_agency = Some("조달청".to_string());
        assert_eq!(RowView::new(&n, false).agency, "조달청");
    }

    #[test]
    fn test_missing_link() {
        assert_eq!(RowView::new(&notice("1", None), false).link, LINK_MISSING);
        assert_eq!(RowView::new(&notice("1", Some("  ")), false).link, LINK_MISSING);
    }

    #[test]
    fn test_rows_reflect_selection() {
        let mut store = ResultStore::new();
        store.replace(vec![notice("a", None), notice("b", None), notice("c", None)]);
        store.toggle("b", true);

        let checked: Vec<bool> = rows(&store).iter().map(|r| r.checked).collect();
        assert_eq!(checked, vec![false, true, false]);
        assert_eq!(checkbox(store.summary()), "[-]");
    }

    #[test]
    fn test_labels() {
        assert_eq!(count_label(0), "0건");
        assert_eq!(count_label(12), "12건");
        assert_eq!(checkbox(SelectionSummary::None), "[ ]");
        assert_eq!(checkbox(SelectionSummary::All), "[x]");
        assert_eq!(row_checkbox(true), "[x]");
    }
}
