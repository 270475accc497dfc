/// Google Sheets client over the REST API.
///
/// Authentication uses a service account: a short-lived RS256 JWT signed
/// with the account's private key is exchanged for an OAuth2 access token,
/// which is cached until shortly before it expires. The spreadsheet is
/// looked up by name through the Drive files listing, so it must be shared
/// with the service account's e-mail address.
///
/// All requests are blocking; callers run on a worker thread.
use crate::error::StoreError;
use crate::store::credentials::{self, ServiceAccountKey};
use crate::store::sheet::{Cell, ConditionalRule, SheetClient};
use parking_lot::Mutex;
use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DRIVE_FILES_API: &str = "https://www.googleapis.com/drive/v3/files";
const SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetMeta {
    properties: SheetProperties,
    #[serde(default)]
    conditional_formats: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
    #[serde(default)]
    index: u32,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Cell>>,
}

/// A [`SheetClient`] bound to one spreadsheet.
pub struct GoogleSheetsClient {
    http: Client,
    key: ServiceAccountKey,
    token: Mutex<Option<AccessToken>>,
    spreadsheet_id: String,
    /// Worksheets in tab order.
    worksheets: Vec<SheetProperties>,
}

impl GoogleSheetsClient {
    /// Open the spreadsheet called `name` with the installed service account.
    pub fn open(name: &str) -> Result<Self, StoreError> {
        Self::open_with_key(name, credentials::load_service_account()?)
    }

    pub fn open_with_key(name: &str, key: ServiceAccountKey) -> Result<Self, StoreError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let mut client = Self {
            http,
            key,
            token: Mutex::new(None),
            spreadsheet_id: String::new(),
            worksheets: Vec::new(),
        };
        client.spreadsheet_id = client.find_spreadsheet(name)?;
        client.worksheets = client
            .metadata("sheets(properties(sheetId,title,index))")?
            .sheets
            .into_iter()
            .map(|s| s.properties)
            .collect();
        client.worksheets.sort_by_key(|p| p.index);
        info!(
            "Opened spreadsheet {name:?} ({} worksheet(s))",
            client.worksheets.len()
        );
        Ok(client)
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn access_token(&self) -> Result<String, StoreError> {
        let mut cached = self.token.lock();
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SCOPES,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };
        let signing_key = jsonwebtoken::EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        let assertion = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256),
            &claims,
            &signing_key,
        )?;

        debug!("Requesting access token for {}", self.key.client_email);
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()?;
        let token: TokenResponse = check(response, "token exchange")?.json()?;

        let lifetime = Duration::from_secs(token.expires_in.saturating_sub(60));
        *cached = Some(AccessToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    fn find_spreadsheet(&self, name: &str) -> Result<String, StoreError> {
        debug!("Looking up spreadsheet {name:?}");
        let response = self
            .http
            .get(DRIVE_FILES_API)
            .bearer_auth(self.access_token()?)
            .query(&[
                ("q", drive_query(name).as_str()),
                ("fields", "files(id,name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()?;
        let list: FileList = check(response, "spreadsheet lookup")?.json()?;
        list.files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| StoreError::SpreadsheetNotFound(name.to_string()))
    }

    fn metadata(&self, fields: &str) -> Result<SpreadsheetMeta, StoreError> {
        let url = self.url(&[])?;
        debug!("GET {url} fields={fields}");
        let response = self
            .http
            .get(url)
            .bearer_auth(self.access_token()?)
            .query(&[("fields", fields)])
            .send()?;
        Ok(check(response, "spreadsheet metadata")?.json()?)
    }

    /// `SHEETS_API/<id>/<segments...>`
    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = Url::parse(SHEETS_API).map_err(|e| StoreError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Url(SHEETS_API.to_string()))?
            .push(&self.spreadsheet_id)
            .extend(segments);
        Ok(url)
    }

    fn worksheet(&self, index: usize) -> Result<&SheetProperties, StoreError> {
        self.worksheets
            .get(index)
            .ok_or(StoreError::MissingWorksheet(index))
    }

    fn batch_update(&self, requests: Vec<Value>) -> Result<(), StoreError> {
        let url = self.url(&[])?;
        let url = Url::parse(&format!("{url}:batchUpdate"))
            .map_err(|e| StoreError::Url(e.to_string()))?;
        debug!("POST {url} ({} request(s))", requests.len());
        let response = self
            .http
            .post(url)
            .bearer_auth(self.access_token()?)
            .json(&json!({ "requests": requests }))
            .send()?;
        check(response, "batch update")?;
        Ok(())
    }
}

impl SheetClient for GoogleSheetsClient {
    fn read_rows(&self, worksheet: usize) -> Result<Vec<Vec<Cell>>, StoreError> {
        let range = quoted_range(&self.worksheet(worksheet)?.title, None);
        let url = self.url(&["values", range.as_str()])?;
        debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .bearer_auth(self.access_token()?)
            .query(&[("valueRenderOption", "UNFORMATTED_VALUE")])
            .send()?;
        let values: ValueRange = check(response, "read values")?.json()?;
        Ok(values.values)
    }

    fn overwrite_rows(&self, worksheet: usize, rows: Vec<Vec<Cell>>) -> Result<(), StoreError> {
        let title = &self.worksheet(worksheet)?.title;

        let clear_url = self.url(&["values", format!("{}:clear", quoted_range(title, None)).as_str()])?;
        debug!("POST {clear_url}");
        let response = self
            .http
            .post(clear_url)
            .bearer_auth(self.access_token()?)
            .json(&json!({}))
            .send()?;
        check(response, "clear values")?;

        let range = quoted_range(title, Some("A1"));
        let url = self.url(&["values", range.as_str()])?;
        debug!("PUT {url} ({} row(s))", rows.len());
        let response = self
            .http
            .put(url)
            .bearer_auth(self.access_token()?)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "range": range, "majorDimension": "ROWS", "values": rows }))
            .send()?;
        check(response, "write values")?;
        Ok(())
    }

    fn replace_column_rules(
        &self,
        worksheet: usize,
        column: u32,
        rules: Vec<ConditionalRule>,
    ) -> Result<(), StoreError> {
        let sheet_id = self.worksheet(worksheet)?.sheet_id;
        let existing = self
            .metadata("sheets(properties(sheetId,title,index),conditionalFormats)")?
            .sheets
            .into_iter()
            .find(|s| s.properties.sheet_id == sheet_id)
            .map(|s| s.conditional_formats)
            .unwrap_or_default();

        let stale = rule_indices_on_column(&existing, column);
        let remaining = existing.len() - stale.len();
        let mut requests: Vec<Value> = stale
            .iter()
            .rev()
            .map(|&index| {
                json!({ "deleteConditionalFormatRule": { "sheetId": sheet_id, "index": index } })
            })
            .collect();
        requests.extend(
            rules
                .iter()
                .enumerate()
                .map(|(i, rule)| add_rule_request(sheet_id, rule, remaining + i)),
        );

        if requests.is_empty() {
            return Ok(());
        }
        self.batch_update(requests)
    }
}

fn check(response: Response, context: &str) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(StoreError::Api {
        status: status.as_u16(),
        context: context.to_string(),
        body: response.text().unwrap_or_default(),
    })
}

/// Drive search expression matching a live spreadsheet with this exact name.
fn drive_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!("name = '{escaped}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false")
}

/// A1 notation for a whole worksheet or one cell of it.
fn quoted_range(title: &str, cell: Option<&str>) -> String {
    let quoted = format!("'{}'", title.replace('\'', "''"));
    match cell {
        Some(cell) => format!("{quoted}!{cell}"),
        None => quoted,
    }
}

/// Positions of the rules whose first range covers exactly `column`.
fn rule_indices_on_column(rules: &[Value], column: u32) -> Vec<usize> {
    let column = u64::from(column);
    rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| {
            let range = &rule["ranges"][0];
            range["startColumnIndex"].as_u64() == Some(column)
                && range["endColumnIndex"].as_u64() == Some(column + 1)
        })
        .map(|(i, _)| i)
        .collect()
}

fn add_rule_request(sheet_id: i64, rule: &ConditionalRule, index: usize) -> Value {
    let r = rule.range;
    json!({
        "addConditionalFormatRule": {
            "index": index,
            "rule": {
                "ranges": [{
                    "sheetId": sheet_id,
                    "startRowIndex": r.start_row,
                    "endRowIndex": r.end_row,
                    "startColumnIndex": r.start_column,
                    "endColumnIndex": r.end_column,
                }],
                "booleanRule": {
                    "condition": {
                        "type": "TEXT_EQ",
                        "values": [{ "userEnteredValue": rule.text_eq }],
                    },
                    "format": {
                        "textFormat": { "bold": true },
                        "backgroundColor": {
                            "red": rule.background.red,
                            "green": rule.background.green,
                            "blue": rule.background.blue,
                        },
                    },
                },
            },
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::sheet::{GridRange, Rgb};

    #[test]
    fn test_quoted_range_escapes_quotes() {
        assert_eq!(quoted_range("Sheet1", None), "'Sheet1'");
        assert_eq!(quoted_range("Bob's drives", Some("A1")), "'Bob''s drives'!A1");
    }

    #[test]
    fn test_drive_query_escapes_name() {
        assert_eq!(
            drive_query("it's"),
            "name = 'it\\'s' and mimeType = 'application/vnd.google-apps.spreadsheet' \
             and trashed = false"
        );
    }

    #[test]
    fn test_rule_indices_match_exact_column_only() {
        let rules = vec![
            json!({ "ranges": [{ "startColumnIndex": 3, "endColumnIndex": 4 }] }),
            json!({ "ranges": [{ "startColumnIndex": 3, "endColumnIndex": 6 }] }),
            json!({ "ranges": [{ "startColumnIndex": 0, "endColumnIndex": 1 }] }),
            json!({ "ranges": [{ "sheetId": 0 }] }),
            json!({ "ranges": [{ "startColumnIndex": 3, "endColumnIndex": 4 }] }),
        ];
        assert_eq!(rule_indices_on_column(&rules, 3), vec![0, 4]);
        assert_eq!(rule_indices_on_column(&rules, 0), vec![2]);
    }

    #[test]
    fn test_add_rule_request_shape() {
        let rule = ConditionalRule {
            range: GridRange {
                start_row: 1,
                end_row: 990,
                start_column: 3,
                end_column: 4,
            },
            text_eq: "Backup 1".to_string(),
            background: Rgb {
                red: 0.6,
                green: 0.3,
                blue: 0.3,
            },
        };
        let request = add_rule_request(7, &rule, 2);
        let add = &request["addConditionalFormatRule"];
        assert_eq!(add["index"], 2);
        assert_eq!(add["rule"]["ranges"][0]["sheetId"], 7);
        assert_eq!(add["rule"]["ranges"][0]["endRowIndex"], 990);
        let boolean = &add["rule"]["booleanRule"];
        assert_eq!(boolean["condition"]["type"], "TEXT_EQ");
        assert_eq!(boolean["condition"]["values"][0]["userEnteredValue"], "Backup 1");
        assert_eq!(boolean["format"]["textFormat"]["bold"], true);
        assert_eq!(boolean["format"]["backgroundColor"]["red"], 0.6);
    }
}
