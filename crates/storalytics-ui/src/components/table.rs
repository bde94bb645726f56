use storalytics_core::{DataTable, DrillTarget};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct DataTableProps {
    pub table: DataTable,
    pub on_select: Callback<DrillTarget>,
}

#[function_component(DataTableView)]
pub(crate) fn data_table_view(props: &DataTableProps) -> Html {
    let table = &props.table;
    html! {
        <div class="tile table">
            <header><span>{&table.title}</span></header>
            <table>
                <thead>
                    <tr>
                        {for table.headers.iter().map(|header| html! {
                            <th data-key={header.key}>{&header.text}</th>
                        })}
                    </tr>
                </thead>
                <tbody>
                    if table.rows.is_empty() {
                        <tr><td class="muted" colspan={table.headers.len().to_string()}>{"No records"}</td></tr>
                    }
                    {for table.rows.iter().map(|row| {
                        let onclick = row.drill.clone().map(|target| {
                            let on_select = props.on_select.clone();
                            Callback::from(move |_: MouseEvent| on_select.emit(target.clone()))
                        });
                        html! {
                            <tr class={classes!(row.clickable().then_some("clickable"))} {onclick}>
                                {for row.cells.iter().map(|cell| html! { <td>{cell}</td> })}
                            </tr>
                        }
                    })}
                </tbody>
            </table>
        </div>
    }
}
