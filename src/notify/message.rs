//! Notification texts for a placed order.

use crate::model::{Customer, Order};

pub const ORDER_EMAIL_SUBJECT: &str = "New Order Placed";

/// A rendered email, independent of the transport that delivers it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub fn order_sms_text(customer: &Customer, order: &Order) -> String {
    format!(
        "Hi {}, your order #{} has been placed!",
        customer.name, order.id.0
    )
}

pub fn order_email(customer: &Customer, order: &Order, to: impl Into<String>) -> OutboundEmail {
    let mut body = format!(
        "Order #{} placed by {} ({})\nProducts:\n",
        order.id.0, customer.name, customer.email
    );
    for item in &order.products {
        body.push_str(&format!("- {} ({:.2})\n", item.name, item.price));
    }
    body.push_str(&format!("Total: {:.2}", order.total));

    OutboundEmail {
        to: to.into(),
        subject: ORDER_EMAIL_SUBJECT.to_string(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomerId, OrderId, OrderItem, ProductId};

    fn fixture() -> (Customer, Order) {
        let customer = Customer::new(CustomerId(1), "Ada", "ada@example.com", "+254700000001");
        let item = OrderItem {
            product_id: ProductId(1),
            name: "Rye".to_string(),
            price: 2.0,
        };
        let order = Order {
            id: OrderId(7),
            customer_id: customer.id,
            products: vec![item.clone(), item],
            total: 4.0,
        };
        (customer, order)
    }

    #[test]
    fn test_sms_text() {
        let (customer, order) = fixture();
        assert_eq!(
            order_sms_text(&customer, &order),
            "Hi Ada, your order #7 has been placed!"
        );
    }

    #[test]
    fn test_email_lists_every_line() {
        let (customer, order) = fixture();
        let email = order_email(&customer, &order, "ops@example.com");

        assert_eq!(email.subject, "New Order Placed");
        assert!(email.body.starts_with("Order #7 placed by Ada (ada@example.com)"));
        assert_eq!(email.body.matches("- Rye (2.00)").count(), 2);
        assert!(email.body.ends_with("Total: 4.00"));
    }
}
