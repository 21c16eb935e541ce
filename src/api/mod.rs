use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    FinancialProfile, Inputs, LoanInputs, MarketInputs, ProjectionResult, PropertyCostInputs,
    RentalInputs, SensitivityGrid, annual_property_expenses, cash_on_cash_grid,
    cash_on_cash_return, debt_to_income_ratio, decision_score, monthly_payment, net_rental_yield,
    price_to_rent_grid, price_to_rent_ratio, project_years,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum AnalysisMode {
    Projection,
    Sensitivity,
    Full,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiAnalysisMode {
    #[serde(alias = "timeline", alias = "costProjection", alias = "cost_projection")]
    Projection,
    #[serde(alias = "grid", alias = "sensitivityGrid", alias = "sensitivity_grid")]
    Sensitivity,
    Full,
}

impl From<ApiAnalysisMode> for AnalysisMode {
    fn from(value: ApiAnalysisMode) -> Self {
        match value {
            ApiAnalysisMode::Projection => AnalysisMode::Projection,
            ApiAnalysisMode::Sensitivity => AnalysisMode::Sensitivity,
            ApiAnalysisMode::Full => AnalysisMode::Full,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
enum ResponseMode {
    Projection,
    Sensitivity,
    Full,
}

impl From<AnalysisMode> for ResponseMode {
    fn from(value: AnalysisMode) -> Self {
        match value {
            AnalysisMode::Projection => ResponseMode::Projection,
            AnalysisMode::Sensitivity => ResponseMode::Sensitivity,
            AnalysisMode::Full => ResponseMode::Full,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AnalyzePayload {
    purchase_price: Option<f64>,
    down_payment_pct: Option<f64>,
    loan_term_years: Option<u32>,
    interest_rate: Option<f64>,
    property_tax_rate: Option<f64>,
    maintenance_cost_rate: Option<f64>,
    annual_rent: Option<f64>,
    rent_increase_rate: Option<f64>,
    appreciation_rate: Option<f64>,
    annual_income: Option<f64>,
    analysis_mode: Option<ApiAnalysisMode>,
}

#[derive(Parser, Debug)]
#[command(
    name = "buyrent",
    about = "Buy-vs-rent calculator (mortgage costs, rental comparison, sensitivity grids)"
)]
struct Cli {
    #[arg(long, default_value_t = 300_000.0, help = "Property purchase price")]
    purchase_price: f64,
    #[arg(
        long,
        default_value_t = 20.0,
        help = "Down payment as a percentage of the purchase price"
    )]
    down_payment_pct: f64,
    #[arg(long, default_value_t = 30, help = "Loan term in years")]
    loan_term_years: u32,
    #[arg(
        long,
        default_value_t = 3.5,
        help = "Annual mortgage interest rate in percent"
    )]
    interest_rate: f64,
    #[arg(
        long,
        default_value_t = 1.0,
        help = "Annual property tax rate in percent of the purchase price"
    )]
    property_tax_rate: f64,
    #[arg(
        long,
        default_value_t = 1.0,
        help = "Annual maintenance cost rate in percent of the purchase price"
    )]
    maintenance_cost_rate: f64,
    #[arg(
        long,
        default_value_t = 15_000.0,
        help = "Annual rent for the comparable rental"
    )]
    annual_rent: f64,
    #[arg(
        long,
        default_value_t = 2.0,
        help = "Annual rent increase rate in percent"
    )]
    rent_increase_rate: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Annual property appreciation rate in percent"
    )]
    appreciation_rate: f64,
    #[arg(
        long,
        default_value_t = 80_000.0,
        help = "Gross annual income used for the debt-to-income ratio"
    )]
    annual_income: f64,
}

#[derive(Copy, Clone, Debug)]
struct ApiOptions {
    mode: AnalysisMode,
}

#[derive(Debug)]
struct ApiRequest {
    inputs: Inputs,
    options: ApiOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricsSummary {
    loan_amount: f64,
    down_payment: f64,
    monthly_payment: f64,
    annual_property_tax: f64,
    annual_maintenance_cost: f64,
    price_to_rent_ratio: Option<f64>,
    net_rental_yield_pct: f64,
    cash_on_cash_return_pct: Option<f64>,
    debt_to_income_pct: Option<f64>,
    decision_score: Option<u8>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SensitivitySection {
    price_to_rent: Option<SensitivityGrid>,
    cash_on_cash: Option<SensitivityGrid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    mode: ResponseMode,
    summary: MetricsSummary,
    projection: Option<ProjectionResult>,
    sensitivity: Option<SensitivitySection>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<Inputs, String> {
    for (name, value) in [
        ("--purchase-price", cli.purchase_price),
        ("--annual-rent", cli.annual_rent),
        ("--annual-income", cli.annual_income),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be >= 0"));
        }
    }

    if !(0.0..=100.0).contains(&cli.down_payment_pct) {
        return Err("--down-payment-pct must be between 0 and 100".to_string());
    }

    if cli.loan_term_years == 0 {
        return Err("--loan-term-years must be >= 1".to_string());
    }

    for (name, rate) in [
        ("--interest-rate", cli.interest_rate),
        ("--property-tax-rate", cli.property_tax_rate),
        ("--maintenance-cost-rate", cli.maintenance_cost_rate),
        ("--rent-increase-rate", cli.rent_increase_rate),
        ("--appreciation-rate", cli.appreciation_rate),
    ] {
        if !rate.is_finite() || rate < 0.0 {
            return Err(format!("{name} must be >= 0"));
        }
    }

    Ok(Inputs {
        loan: LoanInputs {
            purchase_price: cli.purchase_price,
            down_payment_pct: cli.down_payment_pct,
            loan_term_years: cli.loan_term_years,
            annual_interest_rate_pct: cli.interest_rate,
        },
        property: PropertyCostInputs {
            purchase_price: cli.purchase_price,
            property_tax_rate_pct: cli.property_tax_rate,
            maintenance_cost_rate_pct: cli.maintenance_cost_rate,
        },
        rental: RentalInputs {
            annual_rent: cli.annual_rent,
            rent_increase_rate_pct: cli.rent_increase_rate,
        },
        market: MarketInputs {
            annual_appreciation_rate_pct: cli.appreciation_rate,
        },
        profile: FinancialProfile {
            annual_income: cli.annual_income,
        },
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/analyze",
            get(analyze_get_handler).post(analyze_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("buy-vs-rent HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/analyze");

    axum::serve(listener, app).await
}

/// Parses `analyze` subcommand flags, runs the full analysis, and prints one
/// JSON document to stdout.
pub fn run_analysis<I>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = String>,
{
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;
    let inputs = build_inputs(cli)?;
    let response = build_analyze_response(&inputs, AnalysisMode::Full);
    let json = serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn analyze_get_handler(Query(payload): Query<AnalyzePayload>) -> Response {
    analyze_handler_impl(payload).await
}

async fn analyze_post_handler(Json(payload): Json<AnalyzePayload>) -> Response {
    analyze_handler_impl(payload).await
}

async fn analyze_handler_impl(payload: AnalyzePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let response = build_analyze_response(&request.inputs, request.options.mode);
    json_response(StatusCode::OK, response)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<AnalyzePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: AnalyzePayload) -> Result<ApiRequest, String> {
    let mut cli = default_cli_for_api();
    let mut options = ApiOptions {
        mode: AnalysisMode::Projection,
    };

    if let Some(v) = payload.purchase_price {
        cli.purchase_price = v;
    }
    if let Some(v) = payload.down_payment_pct {
        cli.down_payment_pct = v;
    }
    if let Some(v) = payload.loan_term_years {
        cli.loan_term_years = v;
    }
    if let Some(v) = payload.interest_rate {
        cli.interest_rate = v;
    }
    if let Some(v) = payload.property_tax_rate {
        cli.property_tax_rate = v;
    }
    if let Some(v) = payload.maintenance_cost_rate {
        cli.maintenance_cost_rate = v;
    }
    if let Some(v) = payload.annual_rent {
        cli.annual_rent = v;
    }
    if let Some(v) = payload.rent_increase_rate {
        cli.rent_increase_rate = v;
    }
    if let Some(v) = payload.appreciation_rate {
        cli.appreciation_rate = v;
    }
    if let Some(v) = payload.annual_income {
        cli.annual_income = v;
    }
    if let Some(v) = payload.analysis_mode {
        options.mode = v.into();
    }

    let inputs = build_inputs(cli)?;
    Ok(ApiRequest { inputs, options })
}

// Defaults mirror the interactive tool this API replaced.
fn default_cli_for_api() -> Cli {
    Cli {
        purchase_price: 300_000.0,
        down_payment_pct: 20.0,
        loan_term_years: 30,
        interest_rate: 3.5,
        property_tax_rate: 1.0,
        maintenance_cost_rate: 1.0,
        annual_rent: 15_000.0,
        rent_increase_rate: 2.0,
        appreciation_rate: 3.0,
        annual_income: 80_000.0,
    }
}

fn build_analyze_response(inputs: &Inputs, mode: AnalysisMode) -> AnalyzeResponse {
    let loan = &inputs.loan;
    let down_payment = loan.down_payment();
    let loan_amount = loan.loan_amount();
    let payment = monthly_payment(loan_amount, loan.annual_interest_rate_pct, loan.loan_term_years);
    let annual_expenses = annual_property_expenses(
        inputs.property.purchase_price,
        inputs.property.property_tax_rate_pct,
        inputs.property.maintenance_cost_rate_pct,
    );

    let price_to_rent = price_to_rent_ratio(loan.purchase_price, inputs.rental.annual_rent).ok();
    let net_yield = net_rental_yield(
        inputs.rental.annual_rent,
        annual_expenses,
        loan.purchase_price,
    );
    let cash_on_cash =
        cash_on_cash_return(inputs.rental.annual_rent, annual_expenses, down_payment).ok();
    let dti = debt_to_income_ratio(payment, inputs.profile.annual_income).ok();

    // The score needs all four metrics; one undefined ratio leaves it undefined.
    let score = match (price_to_rent, cash_on_cash, dti) {
        (Some(p2r), Some(roi), Some(dti)) => Some(decision_score(p2r, roi, net_yield, dti)),
        _ => None,
    };

    let summary = MetricsSummary {
        loan_amount,
        down_payment,
        monthly_payment: payment,
        annual_property_tax: inputs.property.purchase_price * inputs.property.property_tax_rate_pct
            / 100.0,
        annual_maintenance_cost: inputs.property.purchase_price
            * inputs.property.maintenance_cost_rate_pct
            / 100.0,
        price_to_rent_ratio: price_to_rent,
        net_rental_yield_pct: net_yield,
        cash_on_cash_return_pct: cash_on_cash,
        debt_to_income_pct: dti,
        decision_score: score,
    };

    let projection = match mode {
        AnalysisMode::Projection | AnalysisMode::Full => Some(project_years(
            &inputs.loan,
            &inputs.property,
            &inputs.rental,
            &inputs.market,
        )),
        AnalysisMode::Sensitivity => None,
    };
    let sensitivity = match mode {
        AnalysisMode::Sensitivity | AnalysisMode::Full => Some(build_sensitivity_section(inputs)),
        AnalysisMode::Projection => None,
    };

    AnalyzeResponse {
        mode: mode.into(),
        summary,
        projection,
        sensitivity,
    }
}

fn build_sensitivity_section(inputs: &Inputs) -> SensitivitySection {
    SensitivitySection {
        price_to_rent: price_to_rent_grid(inputs.loan.purchase_price, inputs.rental.annual_rent)
            .ok(),
        cash_on_cash: cash_on_cash_grid(&inputs.loan, &inputs.property, inputs.rental.annual_rent)
            .ok(),
    }
}
