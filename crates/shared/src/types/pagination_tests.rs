use super::*;

#[test]
fn test_page_request_default() {
    let request = PageRequest::default();
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, 20);
}

#[test]
fn test_page_request_offset() {
    let request = PageRequest {
        page: 1,
        per_page: 20,
    };
    assert_eq!(request.offset(), 0);

    let request = PageRequest {
        page: 2,
        per_page: 20,
    };
    assert_eq!(request.offset(), 20);
}

#[test]
fn test_page_request_limit() {
    let request = PageRequest {
        page: 1,
        per_page: 50,
    };
    assert_eq!(request.limit(), 50);
}

#[test]
fn test_page_response_new() {
    let data = vec![1, 2, 3];
    let response = PageResponse::new(data.clone(), 1, 10, 3);

    assert_eq!(response.data, data);
    assert_eq!(response.meta.page, 1);
    assert_eq!(response.meta.per_page, 10);
    assert_eq!(response.meta.total, 3);
    assert_eq!(response.meta.total_pages, 1);
}

#[test]
fn test_page_response_pagination() {
    // 25 items, 10 per page -> 3 pages
    let response: PageResponse<i32> = PageResponse::new(vec![], 1, 10, 25);
    assert_eq!(response.meta.total_pages, 3);
}

#[test]
fn test_page_response_empty() {
    let response: PageResponse<i32> = PageResponse::new(vec![], 1, 10, 0);
    assert_eq!(response.meta.total_pages, 1);
}

#[test]
fn test_page_request_clamps() {
    let request = PageRequest {
        page: 0,
        per_page: 1_000,
    };
    assert_eq!(request.offset(), 0);
    assert_eq!(request.limit(), u64::from(PageRequest::MAX_PER_PAGE));
}

#[test]
fn test_page_request_camel_case() {
    let request: PageRequest = serde_json::from_str(r#"{"page":3,"perPage":5}"#).unwrap();
    assert_eq!(request.page_index(), 2);
    assert_eq!(request.offset(), 10);
}
