use payslip_engine::api::build_router;
use payslip_engine::policy::PayrollPolicy;
use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let (app, _state) = build_router(PayrollPolicy::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn saudi_draft() -> Value {
    json!({
        "employee": { "id": "emp-7", "isSaudi": true },
        "payPeriod": { "month": 4, "year": 2025, "workingDays": 22, "daysWorked": 21 },
        "basicSalary": 10000.0,
        "allowances": [
            { "id": "housing", "name": "Housing Allowance", "nameAr": "بدل سكن", "amount": 2500.0 }
        ],
        "overtime": { "hours": 8.0, "rateMultiplier": 2.0 },
        "deductions": [
            { "id": "d1", "name": "Loan Repayment", "nameLocalized": "سداد قرض", "amount": 400.0 }
        ]
    })
}

#[tokio::test]
async fn preview_returns_totals_with_auto_gosi() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/payroll/preview"))
        .json(&saudi_draft())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let totals: Value = res.json().await.unwrap();

    // 10000 / 176 * 8 * 2 = 909.09 -> 909
    assert_eq!(totals["overtimeAmount"], 909.0);
    assert_eq!(totals["totalEarnings"], 13409.0);
    assert_eq!(totals["totalDeductions"], 1375.0);
    assert_eq!(totals["netPay"], 12034.0);
}

#[tokio::test]
async fn batch_reports_negative_net_pay() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut underwater = saudi_draft();
    underwater["deductions"][0]["amount"] = json!(20000.0);

    let res = client
        .post(server.url("/api/payroll/batch"))
        .json(&vec![saudi_draft(), underwater])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let preview: Value = res.json().await.unwrap();
    assert_eq!(preview["slips"].as_array().map(Vec::len), Some(2));
    assert_eq!(preview["negativeNetPay"], json!([1]));
}

#[tokio::test]
async fn payload_is_rejected_when_days_worked_exceed_working_days() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut draft = saudi_draft();
    draft["payPeriod"]["daysWorked"] = json!(25);

    let res = client
        .post(server.url("/api/payroll/payload"))
        .json(&draft)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("days worked"));
}

#[tokio::test]
async fn payload_has_persistence_shape() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/payroll/payload"))
        .json(&saudi_draft())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let payload: Value = res.json().await.unwrap();
    assert_eq!(payload["employeeId"], "emp-7");
    assert_eq!(payload["deductions"]["gosi"], 975.0);
    assert_eq!(payload["deductions"]["loans"], 400.0);
    assert_eq!(payload["earnings"]["overtime"]["hours"], 8.0);
    assert_eq!(payload["earnings"]["overtime"]["rate"], 2.0);
    assert!(payload["earnings"]["overtime"].get("rateMultiplier").is_none());
    assert_eq!(payload["payment"]["paymentMethod"], "bank_transfer");
}

#[tokio::test]
async fn mileage_claim_uses_default_rate() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/mileage/claim"))
        .json(&json!({
            "vehicleType": "company_car",
            "vehiclePlate": "ABC 1234",
            "journeys": [
                { "id": "j1", "from": "Office", "to": "Court", "distanceKm": 100.0, "roundTrip": true },
                { "id": "j2", "from": "Court", "to": "Client", "distanceKm": 50.0, "roundTrip": false }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let claim: Value = res.json().await.unwrap();
    assert_eq!(claim["totalDistance"], 250.0);
    assert_eq!(claim["ratePerKm"], 0.5);
    assert_eq!(claim["totalMileageAmount"], 125.0);
    assert_eq!(claim["vehiclePlate"], "ABC 1234");
    assert_eq!(claim["journeys"][0]["fromLocation"], "Office");
    assert_eq!(claim["journeys"][0]["toLocation"], "Court");
    assert!(claim["journeys"][0].get("id").is_none());
}

#[tokio::test]
async fn negative_amounts_in_posted_drafts_count_as_zero() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let draft = json!({
        "employee": { "id": "emp-9", "isSaudi": false },
        "payPeriod": { "month": 4, "year": 2025, "workingDays": 22, "daysWorked": 22 },
        "basicSalary": -10000.0,
        "allowances": [ { "id": "a1", "name": "Bonus", "amount": -500.0 } ],
        "overtime": { "hours": -10.0, "rateMultiplier": 1.5 },
        "deductions": [ { "id": "d1", "name": "Loan Repayment", "amount": 400.0 } ]
    });

    let totals: Value = client
        .post(server.url("/api/payroll/preview"))
        .json(&draft)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(totals["totalAllowances"], 0.0);
    assert_eq!(totals["overtimeAmount"], 0.0);
    assert_eq!(totals["totalEarnings"], 0.0);
    assert_eq!(totals["totalDeductions"], 400.0);
    assert_eq!(totals["netPay"], -400.0);

    let res = client
        .post(server.url("/api/payroll/payload"))
        .json(&draft)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let payload: Value = res.json().await.unwrap();
    assert_eq!(payload["earnings"]["basicSalary"], 0.0);
    assert_eq!(payload["earnings"]["allowances"][0]["amount"], 0.0);
    assert!(payload["earnings"].get("overtime").is_none());

    let claim: Value = client
        .post(server.url("/api/mileage/claim"))
        .json(&json!({
            "journeys": [ { "fromLocation": "A", "toLocation": "B", "distanceKm": -80.0, "roundTrip": true } ]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(claim["totalDistance"], 0.0);
    assert_eq!(claim["totalMileageAmount"], 0.0);
}

#[tokio::test]
async fn policy_and_rates_are_readable() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let policy: Value = client
        .get(server.url("/api/policy"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(policy["workingDaysPerMonth"], 22.0);
    assert_eq!(policy["socialInsurance"]["nationalRate"], 9.75);

    let rates: Value = client
        .get(server.url("/api/mileage/rates"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rates["defaultRate"], 0.5);
}

#[tokio::test]
async fn presets_exclude_gosi_from_deductions() {
    let server = TestServer::spawn().await;
    let presets: Value = reqwest::get(server.url("/api/payroll/presets"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let deductions = presets["deductions"].as_array().unwrap();
    assert!(deductions.iter().all(|d| d["name"] != "GOSI"));
    assert_eq!(presets["allowances"][0]["nameAr"], "بدل سكن");
}
