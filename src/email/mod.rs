use std::io::Cursor;

use image::{ImageFormat, Luma};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use qrcode::{EcLevel, QrCode};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("invalid content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("failed to render ticket QR: {0}")]
    Qr(String),
}

/// Ticket facts rendered into the confirmation email.
pub struct BookingConfirmation<'a> {
    pub reference: &'a str,
    pub ticket_code: &'a str,
    pub passenger_name: &'a str,
    pub pickup_point: &'a str,
    pub departure_time: String,
    pub trip_date: String,
    pub seats: i32,
    pub amount: Decimal,
    pub qr_data: &'a str,
}

/// SMTP mailer for booking confirmations and login codes.
///
/// A fresh transport is built per send to avoid holding pooled connections
/// across the process lifetime.
#[derive(Clone)]
pub struct Mailer {
    smtp_host: String,
    smtp_port: u16,
    credentials: Credentials,
    from_email: String,
    from_name: String,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Self {
        Self {
            smtp_host: config.smtp_host.clone(),
            smtp_port: config.smtp_port,
            credentials: Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ),
            from_email: config.email_from.clone(),
            from_name: config.email_from_name.clone(),
        }
    }

    /// Confirmation email with the ticket QR attached as `ticket_qr.png`.
    pub async fn send_booking_confirmation(
        &self,
        to_email: &str,
        to_name: &str,
        booking: &BookingConfirmation<'_>,
    ) -> Result<(), EmailError> {
        let qr_png = render_qr_png(booking.qr_data)?;

        let html = format!(
            "<h2>Booking Confirmation</h2>\
             <p>Dear {name},</p>\
             <p>Thank you for booking with us! Here are your ticket details:</p>\
             <ul>\
             <li><strong>Booking Reference:</strong> {reference}</li>\
             <li><strong>Ticket Code:</strong> {ticket}</li>\
             <li><strong>Passenger Name:</strong> {passenger}</li>\
             <li><strong>Schedule:</strong> {time} on {date}</li>\
             <li><strong>Pickup Point:</strong> {pickup}</li>\
             <li><strong>Number of Seats:</strong> {seats}</li>\
             <li><strong>Total Amount:</strong> {amount} RWF</li>\
             </ul>\
             <p><strong>QR Code:</strong> Please find your QR code attached as \
             'ticket_qr.png'. Present it at the time of boarding.</p>\
             <p>Safe travels!</p>",
            name = to_name,
            reference = booking.reference,
            ticket = booking.ticket_code,
            passenger = booking.passenger_name,
            time = booking.departure_time,
            date = booking.trip_date,
            pickup = booking.pickup_point,
            seats = booking.seats,
            amount = booking.amount,
        );

        let message = Message::builder()
            .from(format!("{} <{}>", self.from_name, self.from_email).parse()?)
            .to(format!("{} <{}>", to_name, to_email).parse()?)
            .subject("Your Booking Confirmation")
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    )
                    .singlepart(
                        Attachment::new("ticket_qr.png".to_string())
                            .body(qr_png, ContentType::parse("image/png")?),
                    ),
            )?;

        self.transport()?.send(message).await?;
        Ok(())
    }

    /// Plain OTP email for the login flow.
    pub async fn send_login_otp(
        &self,
        to_email: &str,
        to_name: &str,
        code: &str,
    ) -> Result<(), EmailError> {
        let html = format!(
            "<h2>Login Verification</h2>\
             <p>Dear {name},</p>\
             <p>Your one-time password (OTP) for login is:</p>\
             <h3>{code}</h3>\
             <p>Please enter this OTP in the login form within 5 minutes. If you \
             did not request this, please ignore this email or contact support.</p>",
            name = to_name,
            code = code,
        );

        let message = Message::builder()
            .from(format!("{} <{}>", self.from_name, self.from_email).parse()?)
            .to(format!("{} <{}>", to_name, to_email).parse()?)
            .subject("Your Login OTP")
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_HTML)
                    .body(html),
            )?;

        self.transport()?.send(message).await?;
        Ok(())
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        Ok(AsyncSmtpTransport::<Tokio1Executor>::relay(&self.smtp_host)?
            .port(self.smtp_port)
            .credentials(self.credentials.clone())
            .build())
    }
}

/// Render the QR payload as an in-memory PNG.
fn render_qr_png(data: &str) -> Result<Vec<u8>, EmailError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::Q)
        .map_err(|e| EmailError::Qr(e.to_string()))?;

    let image = code.render::<Luma<u8>>().min_dimensions(240, 240).build();

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| EmailError::Qr(e.to_string()))?;

    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_payload_to_png() {
        let png = render_qr_png("booking:BK-12345678|ticket:TKT-ABCDEF12345678").unwrap();
        // PNG signature
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']));
    }
}
