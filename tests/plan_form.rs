mod common;

use std::sync::Arc;

use common::{Recorder, Reply};
use courseforms::{
    Alert, AlertQueue, FormController, PlanForm, SubmitStatus,
    form::FieldInput,
    forms::{InventoryKind, PlanPayload, Price},
    money::convert_to_money,
};

fn controller(service: Arc<Recorder<PlanPayload>>) -> FormController<PlanForm> {
    let mut controller = FormController::new(PlanForm, service, Arc::new(AlertQueue::new()));
    controller.set_value("name", FieldInput::text("Mensal")).unwrap();
    controller.set_value("price", FieldInput::text("1050")).unwrap();
    controller
}

#[tokio::test]
async fn price_digits_are_sent_as_cents() {
    let service = Recorder::<PlanPayload>::new(Reply::Created);
    let mut controller = controller(service.clone());

    assert_eq!(controller.submit().await, Some(SubmitStatus::Succeeded));
    let payload = service.last().unwrap();
    assert_eq!(payload.prices, vec![Price { amount: 1050 }]);
    assert_eq!(payload.inventory.kind, InventoryKind::Infinite);
    assert_eq!(payload.inventory.quantity, None);
    assert_eq!(convert_to_money(payload.prices[0].amount, "BRL"), "R$ 10,50");
}

#[tokio::test]
async fn finite_inventory_requires_a_quantity() {
    let service = Recorder::<PlanPayload>::new(Reply::Created);
    let mut controller = controller(service.clone());

    assert!(!controller.state().is_visible("inventoryQuantity"));
    controller
        .set_value("inventoryType", FieldInput::choice("finite"))
        .unwrap();
    assert!(controller.state().is_visible("inventoryQuantity"));

    controller
        .set_value("inventoryQuantity", FieldInput::text(""))
        .unwrap();
    assert!(!controller.can_submit());
    assert_eq!(
        controller.state().displayed_error("inventoryQuantity"),
        Some("Obrigatório")
    );

    controller
        .set_value("inventoryQuantity", FieldInput::text("12"))
        .unwrap();
    assert_eq!(controller.submit().await, Some(SubmitStatus::Succeeded));
    assert_eq!(service.last().unwrap().inventory.quantity, Some(12));
}

#[tokio::test]
async fn switching_back_to_infinite_hides_quantity_errors() {
    let service = Recorder::<PlanPayload>::new(Reply::Created);
    let mut controller = controller(service);
    controller
        .set_value("inventoryType", FieldInput::choice("finite"))
        .unwrap();
    controller
        .set_value("inventoryQuantity", FieldInput::text("-3"))
        .unwrap();
    assert_eq!(
        controller.state().displayed_error("inventoryQuantity"),
        Some("Deve ser maior ou igual a 0")
    );

    controller
        .set_value("inventoryType", FieldInput::choice("infinite"))
        .unwrap();
    assert_eq!(controller.state().displayed_error("inventoryQuantity"), None);
    assert!(controller.can_submit());
}

#[tokio::test]
async fn non_integer_interval_is_rejected() {
    let service = Recorder::<PlanPayload>::new(Reply::Created);
    let mut controller = controller(service.clone());
    controller
        .set_value("recurringInterval", FieldInput::text("1.5"))
        .unwrap();
    assert_eq!(
        controller.state().displayed_error("recurringInterval"),
        Some("Deve ser um número inteiro")
    );
    assert_eq!(controller.submit().await, None);
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn failed_plan_keeps_values_for_retry() {
    let service = Recorder::<PlanPayload>::new(Reply::Fail);
    let alerts = Arc::new(AlertQueue::new());
    let mut controller = FormController::new(PlanForm, service.clone(), alerts.clone())
        .with_initial_values(&serde_json::json!({"name": "Anual", "price": "R$ 120,00"}))
        .unwrap();

    assert_eq!(controller.submit().await, Some(SubmitStatus::Failed));
    assert_eq!(
        alerts.drain().into_iter().map(|queued| queued.alert).collect::<Vec<_>>(),
        vec![Alert::error("Erro ao criar a assinatura!")]
    );
    assert_eq!(controller.state().value_text("name"), Some("Anual"));
    assert_eq!(service.last().unwrap().prices[0].amount, 12000);
}
