//! Chart generation and rendering.
//!
//! Charts are built with charming and serialized to ECharts options, which
//! are drawn in the browser by a small initialization script per page.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger,
    },
    series::{Bar, Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    aggregation::{BudgetVsActual, CategoryTotal, ChartPoint, MonthlyTrend},
    html::HeadElement,
    savings::SavingsGoal,
};

/// A chart with its HTML container ID and ECharts configuration.
pub struct PageChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl PageChart {
    pub fn new(id: &'static str, chart: Chart) -> Self {
        Self {
            id,
            options: chart.to_string(),
        }
    }
}

/// Renders a grid of containers for `charts`.
pub fn charts_view(charts: &[PageChart]) -> Markup {
    html!(
        section class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the JavaScript that draws `charts` once the page has loaded.
///
/// Each chart follows the browser's dark mode setting and resizes with the window.
pub fn charts_script(charts: &[PageChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    HeadElement::ScriptSource(PreEscaped(format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    )))
}

fn base_chart(title: &str, subtitle: &str) -> Chart {
    Chart::new()
        .title(Title::new().text(title).subtext(subtitle))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(80)
                .contain_label(true),
        )
}

fn currency_axis() -> Axis {
    Axis::new()
        .type_(AxisType::Value)
        .axis_label(AxisLabel::new().formatter(currency_formatter()))
}

/// Grouped income and expense bars per period, with net income as a line.
pub fn income_expense_chart(points: &[ChartPoint], subtitle: &str) -> Chart {
    let labels: Vec<String> = points.iter().map(|point| point.period.clone()).collect();

    base_chart("Income vs Expenses", subtitle)
        .tooltip(currency_tooltip())
        .legend(Legend::new().right("4%"))
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(currency_axis())
        .series(
            Bar::new()
                .name("Income")
                .data(points.iter().map(|point| point.income).collect::<Vec<_>>()),
        )
        .series(
            Bar::new()
                .name("Expenses")
                .data(points.iter().map(|point| point.expenses).collect::<Vec<_>>()),
        )
        .series(
            Line::new()
                .name("Net")
                .data(points.iter().map(|point| point.net).collect::<Vec<_>>()),
        )
}

/// A donut chart of spending per category.
pub fn expense_category_chart(categories: &[CategoryTotal]) -> Chart {
    let data: Vec<(f64, &str)> = categories
        .iter()
        .map(|total| (total.amount, total.category.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Expenses by Category"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("0"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// Budgeted and actual spending side by side for each category.
pub fn budget_vs_actual_chart(comparisons: &[BudgetVsActual], subtitle: &str) -> Chart {
    let labels: Vec<&str> = comparisons
        .iter()
        .map(|comparison| comparison.category.as_str())
        .collect();

    base_chart("Budget vs Actual", subtitle)
        .tooltip(currency_tooltip())
        .legend(Legend::new().right("4%"))
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(currency_axis())
        .series(
            Bar::new().name("Budget").data(
                comparisons
                    .iter()
                    .map(|comparison| comparison.budget)
                    .collect::<Vec<_>>(),
            ),
        )
        .series(
            Bar::new().name("Actual").data(
                comparisons
                    .iter()
                    .map(|comparison| comparison.actual)
                    .collect::<Vec<_>>(),
            ),
        )
}

/// Monthly income, expenses and savings as lines.
pub fn monthly_trend_chart(trends: &[MonthlyTrend]) -> Chart {
    let labels: Vec<String> = trends.iter().map(|trend| trend.month.clone()).collect();

    let mut chart = base_chart("Monthly Trends", "Income, expenses and savings")
        .tooltip(currency_tooltip())
        .legend(Legend::new().right("4%"))
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(currency_axis());

    let series: [(&str, fn(&MonthlyTrend) -> f64); 4] = [
        ("Income", |trend| trend.income),
        ("Expenses", |trend| trend.expenses),
        ("Savings", |trend| trend.savings),
        ("Avg Daily Spending", |trend| trend.average_daily_spending),
    ];

    for (name, value) in series {
        chart = chart.series(
            Line::new()
                .name(name)
                .data(trends.iter().map(value).collect::<Vec<_>>()),
        );
    }

    chart
}

/// Progress towards each savings goal as a percentage.
pub fn savings_goal_chart(goals: &[SavingsGoal]) -> Chart {
    let labels: Vec<&str> = goals.iter().map(|goal| goal.goal_name.as_str()).collect();
    let percentages: Vec<f64> = goals
        .iter()
        .map(|goal| (goal.progress_percentage() * 10.0).round() / 10.0)
        .collect();

    Chart::new()
        .title(Title::new().text("Savings Goals").subtext("Progress towards target"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter("{value}%")),
        )
        .y_axis(Axis::new().type_(AxisType::Category).data(labels))
        .series(Bar::new().name("Progress").data(percentages))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
