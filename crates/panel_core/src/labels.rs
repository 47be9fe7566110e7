use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Display language of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ko" => Ok(Locale::Ko),
            other => Err(format!("unknown locale '{other}'")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => f.write_str("en"),
            Locale::Ko => f.write_str("ko"),
        }
    }
}

impl Locale {
    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::En => &EN,
            Locale::Ko => &KO,
        }
    }
}

/// Every user-visible string of the panel for one locale.
#[derive(Debug)]
pub struct Labels {
    pub locale: Locale,
    pub cancelled: &'static str,
    pub cancel: &'static str,
    pub cancelling: &'static str,
    pub view_images: &'static str,
    pub log: &'static str,
    pub delete: &'static str,
    pub delete_hint: &'static str,
    pub copy: &'static str,
    pub copied: &'static str,
    pub copy_failed: &'static str,
    pub error_details: &'static str,
    pub error_hide: &'static str,
    pub empty_history: &'static str,
    pub loading: &'static str,
    pub no_images: &'static str,
    pub images_title: &'static str,
    pub column_id: &'static str,
    pub column_query: &'static str,
    pub column_limit: &'static str,
    pub column_out_dir: &'static str,
    pub column_status: &'static str,
    pub previous: &'static str,
    pub next: &'static str,
    pub confirm_delete: &'static str,
    pub confirm_clear: &'static str,
    pub query_required: &'static str,
    pub starting: &'static str,
    pub run_cancelled: &'static str,
    pub unknown_error: &'static str,
    pub panel_title: &'static str,
    pub run: &'static str,
    pub clear_history: &'static str,
}

const EN: Labels = Labels {
    locale: Locale::En,
    cancelled: "cancelled",
    cancel: "Cancel",
    cancelling: "Cancelling...",
    view_images: "View images",
    log: "Log",
    delete: "Delete",
    delete_hint: "Removes the history entry only",
    copy: "Copy",
    copied: "Copied",
    copy_failed: "Failed",
    error_details: "Error details",
    error_hide: "Hide",
    empty_history: "No collection history yet.",
    loading: "Loading...",
    no_images: "No images",
    images_title: "Collected images",
    column_id: "ID",
    column_query: "Query",
    column_limit: "Limit",
    column_out_dir: "Output folder",
    column_status: "Status / images",
    previous: "Previous",
    next: "Next",
    confirm_delete: "Delete this history entry? (Saved image files are not deleted.)",
    confirm_clear: "Delete the entire collection history?",
    query_required: "Enter a search query.",
    starting: "Starting job...",
    run_cancelled: "Cancelled.",
    unknown_error: "unknown error",
    panel_title: "Image collection jobs",
    run: "Run",
    clear_history: "Clear history",
};

const KO: Labels = Labels {
    locale: Locale::Ko,
    cancelled: "중단됨",
    cancel: "중단",
    cancelling: "중단 중...",
    view_images: "이미지 보기",
    log: "로그",
    delete: "삭제",
    delete_hint: "이력에서만 삭제",
    copy: "복사",
    copied: "복사됨",
    copy_failed: "실패",
    error_details: "에러 상세",
    error_hide: "접기",
    empty_history: "아직 수집 이력이 없습니다.",
    loading: "로딩 중...",
    no_images: "이미지 없음",
    images_title: "수집 이미지",
    column_id: "ID",
    column_query: "검색어",
    column_limit: "개수",
    column_out_dir: "저장 폴더",
    column_status: "상태 / 이미지 보기",
    previous: "이전",
    next: "다음",
    confirm_delete: "이 이력을 삭제할까요? (저장된 이미지 파일은 삭제되지 않습니다.)",
    confirm_clear: "수집 이력을 모두 삭제할까요?",
    query_required: "검색어를 입력하세요.",
    starting: "작업 시작 중...",
    run_cancelled: "중단됨.",
    unknown_error: "알 수 없음",
    panel_title: "이미지 수집 작업",
    run: "실행",
    clear_history: "이력 전체 삭제",
};

impl Labels {
    pub fn collecting(&self, secs: u64) -> String {
        match self.locale {
            Locale::En => format!("collecting ({secs} sec)"),
            Locale::Ko => format!("수집 중 ({secs}초)"),
        }
    }

    pub fn image_count(&self, count: u64) -> String {
        match self.locale {
            Locale::En => format!("{count} images"),
            Locale::Ko => format!("{count}장"),
        }
    }

    pub fn page_info(&self, page: u32, pages: u32, total: u64) -> String {
        match self.locale {
            Locale::En => format!("{page} / {pages} (total {total})"),
            Locale::Ko => format!("{page} / {pages} (총 {total}건)"),
        }
    }

    pub fn modal_title(&self, query: &str, count: u64) -> String {
        format!("{}: {query} ({})", self.images_title, self.image_count(count))
    }

    pub fn history_load_failed(&self, message: &str) -> String {
        match self.locale {
            Locale::En => format!("Failed to load history: {message}"),
            Locale::Ko => format!("이력 불러오기 실패: {message}"),
        }
    }

    pub fn images_load_failed(&self, message: &str) -> String {
        match self.locale {
            Locale::En => format!("Failed to load: {message}"),
            Locale::Ko => format!("불러오기 실패: {message}"),
        }
    }

    pub fn delete_failed(&self, message: &str) -> String {
        match self.locale {
            Locale::En => format!("Delete failed: {message}"),
            Locale::Ko => format!("삭제 실패: {message}"),
        }
    }

    pub fn cancel_failed(&self, message: &str) -> String {
        match self.locale {
            Locale::En => format!("Cancel failed: {message}"),
            Locale::Ko => format!("중단 실패: {message}"),
        }
    }

    pub fn run_started(&self, job_id: &str) -> String {
        match self.locale {
            Locale::En => format!("Job ID: <strong>{job_id}</strong> — collecting..."),
            Locale::Ko => format!("작업 ID: <strong>{job_id}</strong> — 수집 중..."),
        }
    }

    pub fn run_progress(&self, job_id: &str, secs: u64) -> String {
        match self.locale {
            Locale::En => format!("Job ID: <strong>{job_id}</strong> — collecting ({secs} sec)"),
            Locale::Ko => format!("작업 ID: <strong>{job_id}</strong> — 수집 중 ({secs}초)"),
        }
    }

    pub fn run_done(&self, out_dir: &str, count: u64) -> String {
        let count = self.image_count(count);
        match self.locale {
            Locale::En => format!(
                "Done! Saved to: <span class=\"path\">{out_dir}</span>, collected: <span class=\"count\">{count}</span>"
            ),
            Locale::Ko => format!(
                "완료! 저장: <span class=\"path\">{out_dir}</span>, 수집: <span class=\"count\">{count}</span>"
            ),
        }
    }

    pub fn run_failed(&self, message: &str) -> String {
        match self.locale {
            Locale::En => format!("Failed: {message}"),
            Locale::Ko => format!("실패: {message}"),
        }
    }
}
