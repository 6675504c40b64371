//! Market-index fetch over the Yahoo v8 chart API.
//!
//! One bounded blocking request per index; no retries. The base URL can be
//! pointed elsewhere with `STOCK_DASH_INDEX_URL` (read from `.env` too).

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::data::overlay::IndexSource;
use crate::domain::{IndexSeries, MarketIndex};
use crate::error::{AppError, FetchError};

const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
pub const BASE_URL_ENV: &str = "STOCK_DASH_INDEX_URL";

pub struct YahooIndexSource {
    client: Client,
    base_url: String,
}

impl YahooIndexSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stock-dash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_env(timeout: Duration) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url, timeout)
    }

    fn chart_url(&self, index: MarketIndex) -> String {
        // `^` must be percent-encoded in the path segment.
        let symbol = index.symbol().replace('^', "%5E");
        format!("{}/{symbol}", self.base_url)
    }
}

impl IndexSource for YahooIndexSource {
    fn fetch(&self, index: MarketIndex, start: NaiveDate, end: NaiveDate) -> Result<IndexSeries, FetchError> {
        let name = index.display_name().to_string();
        let period1 = start.and_hms_opt(0, 0, 0).map(|d| d.and_utc().timestamp()).unwrap_or(0);
        let period2 = end
            .and_hms_opt(23, 59, 59)
            .map(|d| d.and_utc().timestamp())
            .unwrap_or(period1);

        let url = self.chart_url(index);
        debug!(%url, %start, %end, "fetching index");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .map_err(|source| FetchError::Http {
                index: name.clone(),
                source,
            })?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                index: name,
                status: resp.status().as_u16(),
            });
        }

        let body: ChartResponse = resp.json().map_err(|e| FetchError::Decode {
            index: name.clone(),
            detail: e.to_string(),
        })?;

        parse_chart(index, body)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

fn parse_chart(index: MarketIndex, resp: ChartResponse) -> Result<IndexSeries, FetchError> {
    let name = index.display_name().to_string();
    let decode = |detail: String| FetchError::Decode {
        index: name.clone(),
        detail,
    };

    let data = match (resp.chart.result, resp.chart.error) {
        (Some(result), _) => result
            .into_iter()
            .next()
            .ok_or_else(|| decode("result array is empty".to_string()))?,
        (None, Some(err)) => return Err(decode(format!("{}: {}", err.code, err.description))),
        (None, None) => return Err(decode("empty result with no error".to_string())),
    };

    let timestamps = data.timestamp.unwrap_or_default();
    let closes = data
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    // Holidays come back as nulls; skip them.
    let points: Vec<(NaiveDate, f64)> = timestamps
        .iter()
        .zip(closes)
        .filter_map(|(&ts, close)| {
            let date = chrono::DateTime::from_timestamp(ts, 0)?.date_naive();
            close.filter(|v| v.is_finite()).map(|v| (date, v))
        })
        .collect();

    if points.is_empty() {
        return Err(FetchError::Empty { index: name });
    }

    Ok(IndexSeries { index, points })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<IndexSeries, FetchError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        parse_chart(MarketIndex::Sp500, resp)
    }

    #[test]
    fn parses_closes_and_skips_nulls() {
        let series = parse(
            r#"{"chart":{"result":[{"timestamp":[1704205800,1704292200,1704378600],
                "indicators":{"quote":[{"close":[4742.83,null,4688.68]}]}}],"error":null}}"#,
        )
        .unwrap();
        assert_eq!(series.index, MarketIndex::Sp500);
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0], (NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 4742.83));
        assert_eq!(series.points[1].0, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
    }

    #[test]
    fn api_error_is_decode_failure() {
        let err = parse(r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#)
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn all_null_closes_is_empty() {
        let err = parse(
            r#"{"chart":{"result":[{"timestamp":[1704205800],"indicators":{"quote":[{"close":[null]}]}}],"error":null}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::Empty { .. }));
    }

    #[test]
    fn symbol_is_percent_encoded() {
        let src = YahooIndexSource::new("http://localhost/chart/", Duration::from_secs(1)).unwrap();
        assert_eq!(src.chart_url(MarketIndex::DowJones), "http://localhost/chart/%5EDJI");
    }
}
