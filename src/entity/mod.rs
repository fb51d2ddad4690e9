pub mod cart_items;
pub mod categories;
pub mod coupons;
pub mod customer_profiles;
pub mod enums;
pub mod faqs;
pub mod favorites;
pub mod notifications;
pub mod order_items;
pub mod orders;
pub mod payment_accounts;
pub mod payment_methods;
pub mod payment_transactions;
pub mod product_price_history;
pub mod product_questions;
pub mod product_reviews;
pub mod product_tracking;
pub mod products;
pub mod refunds;
pub mod system_logs;
pub mod ticket_messages;
pub mod tickets;
pub mod users;

pub use cart_items::Entity as CartItems;
pub use categories::Entity as Categories;
pub use coupons::Entity as Coupons;
pub use customer_profiles::Entity as CustomerProfiles;
pub use faqs::Entity as Faqs;
pub use favorites::Entity as Favorites;
pub use notifications::Entity as Notifications;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use payment_accounts::Entity as PaymentAccounts;
pub use payment_methods::Entity as PaymentMethods;
pub use payment_transactions::Entity as PaymentTransactions;
pub use product_price_history::Entity as ProductPriceHistory;
pub use product_questions::Entity as ProductQuestions;
pub use product_reviews::Entity as ProductReviews;
pub use product_tracking::Entity as ProductTracking;
pub use products::Entity as Products;
pub use refunds::Entity as Refunds;
pub use system_logs::Entity as SystemLogs;
pub use ticket_messages::Entity as TicketMessages;
pub use tickets::Entity as Tickets;
pub use users::Entity as Users;
